//! Generation settings attached to every submission.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Target video length.
///
/// The service accepts a fixed set of durations; anything else is a
/// caller contract violation, so the type only admits the valid set.
/// On the wire this is the bare number of seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "u16", try_from = "u16")]
pub enum VideoDuration {
    /// 1 minute
    Sec60,
    /// 2 minutes
    Sec120,
    /// 3 minutes
    #[default]
    Sec180,
    /// 5 minutes
    Sec300,
    /// 10 minutes
    Sec600,
}

impl VideoDuration {
    /// All accepted durations.
    pub const ALL: &'static [VideoDuration] = &[
        VideoDuration::Sec60,
        VideoDuration::Sec120,
        VideoDuration::Sec180,
        VideoDuration::Sec300,
        VideoDuration::Sec600,
    ];

    /// Duration in seconds as sent to the service.
    pub fn as_secs(&self) -> u16 {
        match self {
            VideoDuration::Sec60 => 60,
            VideoDuration::Sec120 => 120,
            VideoDuration::Sec180 => 180,
            VideoDuration::Sec300 => 300,
            VideoDuration::Sec600 => 600,
        }
    }
}

impl From<VideoDuration> for u16 {
    fn from(d: VideoDuration) -> Self {
        d.as_secs()
    }
}

impl TryFrom<u16> for VideoDuration {
    type Error = DurationParseError;

    fn try_from(secs: u16) -> Result<Self, Self::Error> {
        match secs {
            60 => Ok(VideoDuration::Sec60),
            120 => Ok(VideoDuration::Sec120),
            180 => Ok(VideoDuration::Sec180),
            300 => Ok(VideoDuration::Sec300),
            600 => Ok(VideoDuration::Sec600),
            other => Err(DurationParseError(other.to_string())),
        }
    }
}

impl fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_secs())
    }
}

impl FromStr for VideoDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs: u16 = s
            .trim()
            .parse()
            .map_err(|_| DurationParseError(s.to_string()))?;
        Self::try_from(secs)
    }
}

#[derive(Debug, Error)]
#[error("Unsupported duration: {0}, expected one of 60/120/180/300/600")]
pub struct DurationParseError(String);

/// Voiceover style for the generated narration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum VoiceStyle {
    #[default]
    Professional,
    Friendly,
    Authoritative,
    Inspiring,
    Educational,
}

impl VoiceStyle {
    /// All accepted voice styles.
    pub const ALL: &'static [VoiceStyle] = &[
        VoiceStyle::Professional,
        VoiceStyle::Friendly,
        VoiceStyle::Authoritative,
        VoiceStyle::Inspiring,
        VoiceStyle::Educational,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceStyle::Professional => "professional",
            VoiceStyle::Friendly => "friendly",
            VoiceStyle::Authoritative => "authoritative",
            VoiceStyle::Inspiring => "inspiring",
            VoiceStyle::Educational => "educational",
        }
    }
}

impl fmt::Display for VoiceStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VoiceStyle {
    type Err = VoiceStyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "professional" => Ok(VoiceStyle::Professional),
            "friendly" => Ok(VoiceStyle::Friendly),
            "authoritative" => Ok(VoiceStyle::Authoritative),
            "inspiring" => Ok(VoiceStyle::Inspiring),
            "educational" => Ok(VoiceStyle::Educational),
            _ => Err(VoiceStyleParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown voice style: {0}")]
pub struct VoiceStyleParseError(String);

/// Settings copied into a submission request.
///
/// Immutable per submission; the caller keeps its own copy so the
/// values survive a controller reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct RenderSettings {
    /// Target video length
    #[schemars(with = "u16")]
    pub duration: VideoDuration,
    /// Narration voice style
    pub voice_style: VoiceStyle,
}

impl RenderSettings {
    pub fn new(duration: VideoDuration, voice_style: VoiceStyle) -> Self {
        Self {
            duration,
            voice_style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_parse() {
        assert_eq!("180".parse::<VideoDuration>().unwrap(), VideoDuration::Sec180);
        assert_eq!("600".parse::<VideoDuration>().unwrap(), VideoDuration::Sec600);
        assert!("90".parse::<VideoDuration>().is_err());
        assert!("abc".parse::<VideoDuration>().is_err());
    }

    #[test]
    fn test_duration_serializes_as_seconds() {
        let json = serde_json::to_string(&VideoDuration::Sec300).unwrap();
        assert_eq!(json, "300");

        let back: VideoDuration = serde_json::from_str("120").unwrap();
        assert_eq!(back, VideoDuration::Sec120);

        assert!(serde_json::from_str::<VideoDuration>("45").is_err());
    }

    #[test]
    fn test_voice_style_parse() {
        assert_eq!(
            "professional".parse::<VoiceStyle>().unwrap(),
            VoiceStyle::Professional
        );
        assert_eq!("Inspiring".parse::<VoiceStyle>().unwrap(), VoiceStyle::Inspiring);
        assert!("sarcastic".parse::<VoiceStyle>().is_err());
    }

    #[test]
    fn test_settings_wire_shape() {
        let settings = RenderSettings::new(VideoDuration::Sec120, VoiceStyle::Friendly);
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["duration"], 120);
        assert_eq!(json["voice_style"], "friendly");
    }
}
