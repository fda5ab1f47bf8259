//! Controller configuration.

use std::time::Duration;

/// Polling and retry configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Delay between successful status polls
    pub poll_interval: Duration,
    /// First delay after a transport failure (doubles each failure)
    pub retry_base_delay: Duration,
    /// Cap on the transport-failure delay
    pub retry_max_delay: Duration,
    /// Consecutive transport failures tolerated before the job is
    /// declared lost
    pub max_transport_failures: u32,
    /// Default directory for downloaded videos
    pub download_dir: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            retry_base_delay: Duration::from_secs(5),
            retry_max_delay: Duration::from_secs(60),
            max_transport_failures: 5,
            download_dir: "./downloads".to_string(),
        }
    }
}

impl ControllerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_millis(
                std::env::var("BOOKREEL_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(2000),
            ),
            retry_base_delay: Duration::from_millis(
                std::env::var("BOOKREEL_RETRY_BASE_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5000),
            ),
            retry_max_delay: Duration::from_millis(
                std::env::var("BOOKREEL_RETRY_MAX_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60_000),
            ),
            max_transport_failures: std::env::var("BOOKREEL_MAX_TRANSPORT_FAILURES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
            download_dir: std::env::var("BOOKREEL_DOWNLOAD_DIR")
                .unwrap_or_else(|_| "./downloads".to_string()),
        }
    }

    /// Delay before the next poll after `failures` consecutive
    /// transport failures (zero means the regular interval).
    pub fn delay_for_failures(&self, failures: u32) -> Duration {
        if failures == 0 {
            return self.poll_interval;
        }
        let delay = self
            .retry_base_delay
            .saturating_mul(2u32.saturating_pow(failures - 1));
        delay.min(self.retry_max_delay)
    }
}
