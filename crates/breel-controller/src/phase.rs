//! Client-side job phase.

use serde::{Deserialize, Serialize};

use breel_models::VideoResult;

/// The one value describing where a tracked job stands.
///
/// Result and error text live inside their phases, so a result
/// without completion or an error message without a failure cannot be
/// expressed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobPhase {
    /// No job tracked; a submission is allowed
    #[default]
    Idle,
    /// Submission request in flight
    Uploading,
    /// Job accepted, polling for progress
    Processing {
        /// Progress percentage (0-100)
        progress: u8,
        /// Current step description
        message: String,
    },
    /// Terminal: the video is ready
    Completed {
        /// Final payload from the service
        result: VideoResult,
    },
    /// Terminal: the job or its submission failed
    Failed {
        /// What went wrong
        message: String,
    },
}

impl JobPhase {
    /// Short name of the phase.
    pub fn label(&self) -> &'static str {
        match self {
            JobPhase::Idle => "idle",
            JobPhase::Uploading => "uploading",
            JobPhase::Processing { .. } => "processing",
            JobPhase::Completed { .. } => "completed",
            JobPhase::Failed { .. } => "failed",
        }
    }

    /// Terminal phases stay put until an explicit reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobPhase::Completed { .. } | JobPhase::Failed { .. })
    }

    /// Whether a job is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, JobPhase::Uploading | JobPhase::Processing { .. })
    }

    /// Progress when available (uploading counts as zero).
    pub fn progress(&self) -> Option<u8> {
        match self {
            JobPhase::Uploading => Some(0),
            JobPhase::Processing { progress, .. } => Some(*progress),
            JobPhase::Completed { .. } => Some(100),
            _ => None,
        }
    }
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
