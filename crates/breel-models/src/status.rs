//! Status reports returned by the polling endpoint.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::RemoteStatus;
use crate::result::VideoResult;

/// Snapshot of a job as returned by `GET /api/job/{id}`.
///
/// Two revisions of the service disagree on the step-description
/// field (`current_step` vs `message`); both are carried and
/// [`StatusReport::step_message`] picks whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatusReport {
    /// Job ID echoed back by some server revisions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,

    /// Current job status
    pub status: RemoteStatus,

    /// Progress percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Current processing step description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,

    /// Human-readable status message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Final result, set only on completed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<VideoResult>,

    /// Error message, set only on failed jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StatusReport {
    /// Check if the report describes a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Progress clamped to the 0-100 range.
    pub fn clamped_progress(&self) -> u8 {
        self.progress.min(100)
    }

    /// Best available step description.
    pub fn step_message(&self) -> Option<&str> {
        self.current_step
            .as_deref()
            .or(self.message.as_deref())
            .filter(|s| !s.is_empty())
    }
}
