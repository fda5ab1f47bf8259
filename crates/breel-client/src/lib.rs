//! HTTP client for the Bookreel video generation service.
//!
//! The service accepts a document (file upload or URL), renders a
//! short video with an AI-generated voiceover, and exposes job status
//! and download endpoints. This crate covers that surface: submission,
//! status polling, download-ticket retrieval, and streaming the
//! finished file to disk.

pub mod client;
pub mod error;
pub mod types;

pub use client::{GeneratorClient, GeneratorClientConfig};
pub use error::{ClientError, ClientResult};
pub use types::UrlSubmission;
