//! Generation service HTTP client.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use breel_models::{
    DownloadTicket, JobId, RenderSettings, SourceDocument, StatusReport, SubmissionReceipt,
};

use crate::error::{ClientError, ClientResult};
use crate::types::UrlSubmission;

/// Configuration for the generation client.
#[derive(Debug, Clone)]
pub struct GeneratorClientConfig {
    /// Base URL of the generation service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for submissions
    pub max_retries: u32,
}

impl Default for GeneratorClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 2,
        }
    }
}

impl GeneratorClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("BOOKREEL_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            timeout: Duration::from_secs(
                std::env::var("BOOKREEL_API_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
            max_retries: std::env::var("BOOKREEL_API_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
        }
    }
}

/// Client for the document-to-video generation service.
pub struct GeneratorClient {
    http: Client,
    config: GeneratorClientConfig,
}

impl GeneratorClient {
    /// Create a new generation client.
    pub fn new(config: GeneratorClientConfig) -> ClientResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ClientError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ClientResult<Self> {
        Self::new(GeneratorClientConfig::from_env())
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Check if the generation service is healthy.
    pub async fn health_check(&self) -> ClientResult<bool> {
        let url = format!("{}/health", self.config.base_url);

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => Ok(true),
            Ok(response) => {
                warn!("Generation service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Generation service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Upload a document for processing.
    ///
    /// Sends the file plus settings as a multipart form and returns
    /// the job the service created for it.
    pub async fn submit_document(
        &self,
        document: SourceDocument,
        settings: RenderSettings,
    ) -> ClientResult<SubmissionReceipt> {
        let url = format!("{}/api/upload", self.config.base_url);
        let (file_name, kind, bytes) = document.into_parts();

        debug!(
            file_name = %file_name,
            size = bytes.len(),
            "Uploading document to {}", url
        );

        let response = self
            .with_retry(|| async {
                // Multipart forms are single-use; rebuild per attempt.
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(kind.mime())?;
                let form = Form::new()
                    .part("file", part)
                    .text("duration", settings.duration.as_secs().to_string())
                    .text("voice_style", settings.voice_style.to_string());

                self.http
                    .post(&url)
                    .multipart(form)
                    .send()
                    .await
                    .map_err(ClientError::Network)
            })
            .await?;

        Self::decode(response).await
    }

    /// Submit an article or online-ebook URL for processing.
    pub async fn submit_url(
        &self,
        source_url: impl Into<String>,
        settings: RenderSettings,
    ) -> ClientResult<SubmissionReceipt> {
        let url = format!("{}/api/process", self.config.base_url);
        let body = UrlSubmission {
            url: source_url.into(),
            duration: settings.duration,
            voice_style: settings.voice_style,
        };

        debug!(source_url = %body.url, "Submitting URL to {}", url);

        let response = self
            .with_retry(|| async {
                self.http
                    .post(&url)
                    .json(&body)
                    .send()
                    .await
                    .map_err(ClientError::Network)
            })
            .await?;

        Self::decode(response).await
    }

    /// Fetch the current status of a job.
    ///
    /// Issued without internal retries: the polling loop owns the
    /// retry policy for this endpoint.
    pub async fn job_status(&self, job_id: &JobId) -> ClientResult<StatusReport> {
        let url = format!("{}/api/job/{}", self.config.base_url, job_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Network)?;

        Self::decode(response).await
    }

    /// Fetch the download ticket for a completed job.
    pub async fn download_ticket(&self, job_id: &JobId) -> ClientResult<DownloadTicket> {
        let url = format!("{}/api/download/{}", self.config.base_url, job_id);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Network)?;

        Self::decode(response).await
    }

    /// Resolve a possibly service-relative download URL.
    pub fn resolve_download_url(&self, download_url: &str) -> String {
        if download_url.starts_with("http://") || download_url.starts_with("https://") {
            download_url.to_string()
        } else {
            format!(
                "{}/{}",
                self.config.base_url.trim_end_matches('/'),
                download_url.trim_start_matches('/')
            )
        }
    }

    /// Stream a download URL to `dest`, returning the bytes written.
    pub async fn fetch_to_file(&self, download_url: &str, dest: &Path) -> ClientResult<u64> {
        let url = self.resolve_download_url(download_url);
        debug!(url = %url, dest = %dest.display(), "Downloading rendered file");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(ClientError::Network)?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ClientError::Network)?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(bytes = written, "Download complete");
        Ok(written)
    }

    /// Default file name for a job's rendered video.
    pub fn video_file_name(job_id: &JobId) -> PathBuf {
        PathBuf::from(format!("video_{}.mp4", job_id))
    }

    /// Decode a JSON response, mapping non-2xx statuses to errors.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let body = response.text().await.map_err(ClientError::Network)?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(format!("{}: {}", e, truncated(&body))))
    }

    /// Map a non-success response to the right error variant.
    async fn status_error(response: reqwest::Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        use reqwest::StatusCode;
        match status {
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
                ClientError::ServiceUnavailable(format!("{}: {}", status, truncated(&body)))
            }
            _ => ClientError::RequestFailed(format!(
                "generation service returned {}: {}",
                status,
                truncated(&body)
            )),
        }
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> ClientResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = ClientResult<T>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "Request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or(ClientError::RequestFailed("Unknown error".to_string())))
    }
}

/// Clip long response bodies out of error messages.
fn truncated(body: &str) -> &str {
    let end = body
        .char_indices()
        .nth(200)
        .map(|(i, _)| i)
        .unwrap_or(body.len());
    &body[..end]
}
