//! Shared data models for the Bookreel generation client.
//!
//! This crate provides Serde-serializable types for:
//! - Generation settings (video duration, voice style)
//! - Job identifiers and remote job status
//! - Status reports returned by the polling endpoint
//! - Generated video results and marketing copy
//! - Upload source validation (PDF/plain-text documents)

pub mod job;
pub mod receipt;
pub mod result;
pub mod settings;
pub mod source;
pub mod status;

// Re-export common types
pub use job::{JobId, RemoteStatus};
pub use receipt::{DownloadTicket, SubmissionReceipt};
pub use result::{ContentCategory, MarketingContent, VideoResult};
pub use settings::{RenderSettings, VideoDuration, VoiceStyle};
pub use source::{DocumentKind, SourceDocument, SourceError, MAX_UPLOAD_BYTES};
pub use status::StatusReport;
