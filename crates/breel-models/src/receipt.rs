//! Wire responses for submission and download requests.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::job::JobId;

/// Response to a successful submission.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SubmissionReceipt {
    /// Identifier of the job the service created
    pub job_id: JobId,

    /// Optional human-readable acknowledgement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// When the client recorded the submission
    #[serde(default = "Utc::now")]
    pub submitted_at: DateTime<Utc>,
}

/// Response to a download request.
///
/// The URL is absent while the file is not ready; callers must treat
/// that as a non-fatal condition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DownloadTicket {
    /// URL of the rendered file, absolute or service-relative
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Optional human-readable note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl DownloadTicket {
    /// Check whether the file can be fetched.
    pub fn is_ready(&self) -> bool {
        self.download_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}
