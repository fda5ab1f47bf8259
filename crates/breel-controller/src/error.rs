//! Controller error types.

use thiserror::Error;

use breel_client::ClientError;

pub type ControllerResult<T> = Result<T, ControllerError>;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("A job is already tracked; reset before submitting again")]
    Busy,

    #[error("URL must not be empty")]
    EmptyUrl,

    #[error("Submission failed: {0}")]
    Submit(ClientError),

    #[error("No completed job to download")]
    NotCompleted,

    #[error("Download not available yet")]
    DownloadUnavailable,

    #[error("Download failed: {0}")]
    Download(ClientError),
}
