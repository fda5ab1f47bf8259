//! Request bodies specific to the generation service.

use serde::{Deserialize, Serialize};

use breel_models::{VideoDuration, VoiceStyle};

/// Body of a URL-ingestion request.
///
/// No client-side URL validation beyond non-emptiness: malformed URLs
/// are rejected by the service and come back as a job failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UrlSubmission {
    /// Article or online-ebook URL to ingest
    pub url: String,
    /// Target video length in seconds
    pub duration: VideoDuration,
    /// Narration voice style
    pub voice_style: VoiceStyle,
}
