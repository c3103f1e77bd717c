//! Fixed-interval status polling for asynchronous generation jobs.
//!
//! When the generate endpoint answers with a `status_url` instead of an
//! image, [`poll_for_result`] keeps fetching that URL until it yields an
//! image URL, reports a terminal failure, or the attempt budget runs out.

use std::time::Duration;

use serde_json::Value;

use crate::api::{FiboApi, FiboApiError};
use crate::response::{classify_status, extract_image_url, PollStatus};

/// Tunable parameters for status polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Number of status requests before giving up.
    pub max_attempts: u32,
    /// Delay between consecutive status requests.
    pub delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            delay: Duration::from_secs(1),
        }
    }
}

/// Poll `status_url` until the job completes.
///
/// An image URL in any response ends polling immediately, whatever the
/// reported status. A completed status without an image URL is returned
/// as-is and left for the caller to reject.
pub async fn poll_for_result(
    api: &FiboApi,
    status_url: &str,
    config: &PollConfig,
) -> Result<Value, FiboApiError> {
    for attempt in 1..=config.max_attempts {
        tracing::info!(
            attempt,
            max_attempts = config.max_attempts,
            status_url,
            "Polling generation status",
        );

        let data = api.get_status(status_url).await?;

        if extract_image_url(&data).is_some() {
            return Ok(data);
        }

        let status = data.get("status").and_then(Value::as_str).unwrap_or("");
        match classify_status(status) {
            PollStatus::Completed => return Ok(data),
            PollStatus::Failed => {
                return Err(FiboApiError::GenerationFailed(data.to_string()));
            }
            PollStatus::Pending => {}
            PollStatus::Unknown => {
                tracing::warn!(status, "Unknown generation status, continuing to poll");
            }
        }

        if attempt < config.max_attempts {
            tokio::time::sleep(config.delay).await;
        }
    }

    Err(FiboApiError::PollTimeout {
        attempts: config.max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_budget() {
        let config = PollConfig::default();
        assert_eq!(config.max_attempts, 30);
        assert_eq!(config.delay, Duration::from_secs(1));
    }

    #[test]
    fn partial_override() {
        let config = PollConfig {
            max_attempts: 3,
            ..Default::default()
        };
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.delay, Duration::from_secs(1));
    }
}
