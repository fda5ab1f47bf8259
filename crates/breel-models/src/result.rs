//! Generated video result and marketing copy.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Content category assigned by the analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentCategory {
    Business,
    SelfDevelopment,
    Science,
    History,
    Technology,
    Health,
    #[serde(other)]
    Other,
}

impl ContentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCategory::Business => "business",
            ContentCategory::SelfDevelopment => "self_development",
            ContentCategory::Science => "science",
            ContentCategory::History => "history",
            ContentCategory::Technology => "technology",
            ContentCategory::Health => "health",
            ContentCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Social copy generated alongside the video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MarketingContent {
    /// Post caption
    pub caption: String,

    /// Ordered hashtag list
    pub hashtags: Vec<String>,

    /// Long-form description
    pub description: String,

    /// Opening hook line
    pub hook: String,
}

impl MarketingContent {
    /// Hashtags joined for display ("#a #b #c").
    pub fn hashtag_line(&self) -> String {
        self.hashtags.join(" ")
    }
}

/// Final payload of a completed job.
///
/// Present on a status report if and only if the job completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoResult {
    /// Server-side path of the rendered video
    pub video_path: String,

    /// Server-side path of the voiceover track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_path: Option<String>,

    /// Narration script used for the voiceover
    pub script: String,

    /// Detected content category
    pub category: ContentCategory,

    /// Generated social copy
    pub marketing: MarketingContent,

    /// Actual video duration in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json() -> &'static str {
        r#"{
            "video_path": "outputs/job-1.mp4",
            "audio_path": "outputs/job-1.mp3",
            "script": "Once upon a time...",
            "category": "self_development",
            "marketing": {
                "caption": "A book in three minutes",
                "hashtags": ["#books", "#booktok"],
                "description": "The key ideas, condensed.",
                "hook": "You are one chapter away"
            },
            "duration": 178
        }"#
    }

    #[test]
    fn test_result_decodes() {
        let result: VideoResult = serde_json::from_str(sample_json()).unwrap();
        assert_eq!(result.video_path, "outputs/job-1.mp4");
        assert_eq!(result.category, ContentCategory::SelfDevelopment);
        assert_eq!(result.marketing.hashtag_line(), "#books #booktok");
        assert_eq!(result.duration, Some(178));
    }

    #[test]
    fn test_result_tolerates_trimmed_payload() {
        // The demo server omits audio_path and duration.
        let json = r#"{
            "video_path": "outputs/job-2.mp4",
            "script": "s",
            "category": "business",
            "marketing": {"caption": "c", "hashtags": [], "description": "d", "hook": "h"}
        }"#;
        let result: VideoResult = serde_json::from_str(json).unwrap();
        assert!(result.audio_path.is_none());
        assert!(result.duration.is_none());
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let category: ContentCategory = serde_json::from_str("\"astrology\"").unwrap();
        assert_eq!(category, ContentCategory::Other);
    }
}
