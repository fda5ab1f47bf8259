//! The job submission and polling controller.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use breel_client::GeneratorClient;
use breel_models::{JobId, RemoteStatus, RenderSettings, SourceDocument, StatusReport};

use crate::config::ControllerConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::phase::JobPhase;

/// Message shown when the service stops answering status polls.
const CONNECTION_LOST: &str =
    "Lost connection to the generation service; the job may still be running";

/// Tracks one generation job at a time.
///
/// The current [`JobPhase`] is published over a watch channel;
/// subscribe with [`JobController::subscribe`]. Polling runs on a
/// spawned task that stops on terminal status, on [`reset`], or when
/// the controller is dropped (the shutdown channel closes with it).
///
/// [`reset`]: JobController::reset
pub struct JobController {
    client: Arc<GeneratorClient>,
    config: ControllerConfig,
    phase: Arc<watch::Sender<JobPhase>>,
    active: Mutex<Option<ActiveJob>>,
}

struct ActiveJob {
    job_id: JobId,
    shutdown: watch::Sender<bool>,
    poll_task: JoinHandle<()>,
}

impl JobController {
    /// Create a controller in the idle phase.
    pub fn new(client: GeneratorClient, config: ControllerConfig) -> Self {
        let (phase, _) = watch::channel(JobPhase::Idle);
        Self {
            client: Arc::new(client),
            config,
            phase: Arc::new(phase),
            active: Mutex::new(None),
        }
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<JobPhase> {
        self.phase.subscribe()
    }

    /// Current phase snapshot.
    pub fn phase(&self) -> JobPhase {
        self.phase.borrow().clone()
    }

    /// Identifier of the tracked job, if any.
    pub async fn job_id(&self) -> Option<JobId> {
        self.active.lock().await.as_ref().map(|j| j.job_id.clone())
    }

    /// Upload a document and start tracking the resulting job.
    ///
    /// The document is already validated ([`SourceDocument`] rejects
    /// wrong types and oversized payloads at construction), so
    /// nothing is re-checked here.
    pub async fn submit_document(
        &self,
        document: SourceDocument,
        settings: RenderSettings,
    ) -> ControllerResult<JobId> {
        let mut active = self.active.lock().await;
        self.ensure_idle()?;

        self.set_phase(JobPhase::Uploading);
        debug!(
            file_name = document.file_name(),
            size = document.len(),
            "Submitting document"
        );

        match self.client.submit_document(document, settings).await {
            Ok(receipt) => Ok(self.track(&mut active, receipt.job_id, receipt.message)),
            Err(e) => {
                self.set_phase(JobPhase::Failed {
                    message: format!("Upload failed: {e}"),
                });
                Err(ControllerError::Submit(e))
            }
        }
    }

    /// Submit a URL and start tracking the resulting job.
    ///
    /// Only emptiness is checked client-side; a malformed URL comes
    /// back from the service as a job failure.
    pub async fn submit_url(
        &self,
        url: &str,
        settings: RenderSettings,
    ) -> ControllerResult<JobId> {
        if url.trim().is_empty() {
            return Err(ControllerError::EmptyUrl);
        }

        let mut active = self.active.lock().await;
        self.ensure_idle()?;

        self.set_phase(JobPhase::Uploading);
        debug!(url, "Submitting URL");

        match self.client.submit_url(url, settings).await {
            Ok(receipt) => Ok(self.track(&mut active, receipt.job_id, receipt.message)),
            Err(e) => {
                self.set_phase(JobPhase::Failed {
                    message: format!("URL processing failed: {e}"),
                });
                Err(ControllerError::Submit(e))
            }
        }
    }

    /// Download the completed job's video into the configured
    /// download directory.
    pub async fn download(&self) -> ControllerResult<PathBuf> {
        let dir = self.config.download_dir.clone();
        self.download_to(Path::new(&dir)).await
    }

    /// Download the completed job's video into `dest_dir`.
    ///
    /// Never touches the job phase: a failed or not-yet-available
    /// download leaves the completed job intact.
    pub async fn download_to(&self, dest_dir: &Path) -> ControllerResult<PathBuf> {
        let job_id = {
            let active = self.active.lock().await;
            match (active.as_ref(), self.phase()) {
                (Some(job), JobPhase::Completed { .. }) => job.job_id.clone(),
                _ => return Err(ControllerError::NotCompleted),
            }
        };

        let ticket = self
            .client
            .download_ticket(&job_id)
            .await
            .map_err(ControllerError::Download)?;

        let Some(url) = ticket.download_url.filter(|u| !u.is_empty()) else {
            warn!(job_id = %job_id, "Download ticket has no URL");
            return Err(ControllerError::DownloadUnavailable);
        };

        let dest = dest_dir.join(GeneratorClient::video_file_name(&job_id));
        self.client
            .fetch_to_file(&url, &dest)
            .await
            .map_err(ControllerError::Download)?;

        info!(job_id = %job_id, path = %dest.display(), "Video downloaded");
        Ok(dest)
    }

    /// Stop tracking the current job and return to idle.
    ///
    /// Safe from any phase; the poll task is cancelled if still
    /// running.
    pub async fn reset(&self) {
        let mut active = self.active.lock().await;
        if let Some(job) = active.take() {
            let _ = job.shutdown.send(true);
            job.poll_task.abort();
            info!(job_id = %job.job_id, "Job cleared");
        }
        self.set_phase(JobPhase::Idle);
    }

    fn ensure_idle(&self) -> ControllerResult<()> {
        match self.phase() {
            JobPhase::Idle => Ok(()),
            _ => Err(ControllerError::Busy),
        }
    }

    fn set_phase(&self, phase: JobPhase) {
        publish(&self.phase, phase);
    }

    /// Record the accepted job and start its poll task.
    fn track(
        &self,
        active: &mut Option<ActiveJob>,
        job_id: JobId,
        message: Option<String>,
    ) -> JobId {
        info!(job_id = %job_id, "Submission accepted");
        self.set_phase(JobPhase::Processing {
            progress: 0,
            message: message.unwrap_or_else(|| "Waiting for processing to start".to_string()),
        });

        let (shutdown, shutdown_rx) = watch::channel(false);
        let client = Arc::clone(&self.client);
        let phase = Arc::clone(&self.phase);
        let config = self.config.clone();
        let poll_id = job_id.clone();

        let poll_task = tokio::spawn(async move {
            poll_until_terminal(client, config, phase, poll_id, shutdown_rx).await;
        });

        *active = Some(ActiveJob {
            job_id: job_id.clone(),
            shutdown,
            poll_task,
        });
        job_id
    }
}

/// Publish a phase, skipping the wakeup when nothing changed (polls
/// often repeat the same progress value).
fn publish(phase: &watch::Sender<JobPhase>, next: JobPhase) {
    phase.send_if_modified(|current| {
        if *current == next {
            return false;
        }
        *current = next;
        true
    });
}

/// Poll job status until a terminal report, cancellation, or too many
/// consecutive transport failures.
async fn poll_until_terminal(
    client: Arc<GeneratorClient>,
    config: ControllerConfig,
    phase: Arc<watch::Sender<JobPhase>>,
    job_id: JobId,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut failures: u32 = 0;

    loop {
        let outcome = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!(job_id = %job_id, "Polling cancelled");
                    return;
                }
                continue;
            }
            result = client.job_status(&job_id) => result,
        };

        match outcome {
            Ok(report) => {
                failures = 0;
                if apply_report(&phase, &job_id, report) {
                    return;
                }
            }
            Err(e) => {
                failures += 1;
                if failures >= config.max_transport_failures {
                    warn!(
                        job_id = %job_id,
                        failures,
                        "Giving up on status polls: {}", e
                    );
                    publish(&phase, JobPhase::Failed {
                        message: CONNECTION_LOST.to_string(),
                    });
                    return;
                }
                warn!(job_id = %job_id, failures, "Status poll failed, retrying: {}", e);
            }
        }

        let delay = config.delay_for_failures(failures);
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    debug!(job_id = %job_id, "Polling cancelled");
                    return;
                }
            }
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

/// Fold a status report into the phase. Returns true when terminal.
fn apply_report(
    phase: &watch::Sender<JobPhase>,
    job_id: &JobId,
    report: StatusReport,
) -> bool {
    match report.status {
        RemoteStatus::Completed => {
            match report.result {
                Some(result) => {
                    info!(job_id = %job_id, "Job completed");
                    publish(phase, JobPhase::Completed { result });
                }
                None => {
                    // A completed job must carry its result; anything
                    // else is a broken service response.
                    warn!(job_id = %job_id, "Completed status without a result");
                    publish(phase, JobPhase::Failed {
                        message: "Service reported completion without a result".to_string(),
                    });
                }
            }
            true
        }
        RemoteStatus::Failed => {
            let message = report
                .error
                .clone()
                .or_else(|| report.step_message().map(str::to_string))
                .unwrap_or_else(|| "Generation failed".to_string());
            warn!(job_id = %job_id, "Job failed: {}", message);
            publish(phase, JobPhase::Failed { message });
            true
        }
        _ => {
            let progress = report.clamped_progress();
            let message = report.step_message().unwrap_or("Processing").to_string();
            debug!(job_id = %job_id, progress, "Job progress: {}", message);
            publish(phase, JobPhase::Processing { progress, message });
            false
        }
    }
}
