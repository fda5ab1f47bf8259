//! Job submission and polling controller.
//!
//! This crate owns the client-side lifecycle of a generation job:
//! - submit a document or URL and receive a job ID
//! - poll job status on a cancellable background task until terminal
//! - publish the current phase over a watch channel
//! - download the rendered video for a completed job
//!
//! One job at a time: a new submission requires the controller to be
//! idle, and `reset()` returns it there from any phase.

pub mod config;
pub mod controller;
pub mod error;
pub mod phase;

pub use config::ControllerConfig;
pub use controller::JobController;
pub use error::{ControllerError, ControllerResult};
pub use phase::JobPhase;
