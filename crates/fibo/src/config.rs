//! FIBO client configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use crate::poll::PollConfig;

/// Production text-to-image endpoint.
pub const DEFAULT_API_URL: &str = "https://engine.prod.bria-api.com/v2/image/generate";

/// Client configuration.
///
/// | Env var                      | Default                | Description                          |
/// |------------------------------|------------------------|--------------------------------------|
/// | `FIBO_API_URL`               | [`DEFAULT_API_URL`]    | Generation endpoint                  |
/// | `FIBO_API_KEY`               | (none)                 | API token; absent means offline mode |
/// | `OUTPUT_DIR`                 | `outputs`              | Root directory for image artifacts   |
/// | `FIBO_REQUEST_TIMEOUT_SECS`  | `60`                   | Per-request HTTP timeout             |
/// | `FIBO_POLL_MAX_ATTEMPTS`     | `30`                   | Status polls before giving up        |
/// | `FIBO_POLL_DELAY_MS`         | `1000`                 | Delay between status polls           |
#[derive(Debug, Clone)]
pub struct FiboConfig {
    /// Empty means offline mode.
    pub api_url: String,
    pub api_key: Option<String>,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
    pub poll: PollConfig,
}

impl Default for FiboConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            output_dir: PathBuf::from("outputs"),
            request_timeout: Duration::from_secs(60),
            poll: PollConfig::default(),
        }
    }
}

impl FiboConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable numeric values fall back to their defaults with a
    /// warning. Blank strings count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout = parse_or(get("FIBO_REQUEST_TIMEOUT_SECS"), "FIBO_REQUEST_TIMEOUT_SECS")
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);
        let max_attempts = parse_or(get("FIBO_POLL_MAX_ATTEMPTS"), "FIBO_POLL_MAX_ATTEMPTS")
            .unwrap_or(defaults.poll.max_attempts);
        let delay = parse_or(get("FIBO_POLL_DELAY_MS"), "FIBO_POLL_DELAY_MS")
            .map(Duration::from_millis)
            .unwrap_or(defaults.poll.delay);

        Self {
            api_url: get("FIBO_API_URL").unwrap_or(defaults.api_url),
            api_key: get("FIBO_API_KEY"),
            output_dir: get("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            request_timeout,
            poll: PollConfig {
                max_attempts,
                delay,
            },
        }
    }

    /// Whether a real backend can be reached with this configuration.
    pub fn is_online(&self) -> bool {
        self.api_key.is_some() && !self.api_url.trim().is_empty()
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, key: &str) -> Option<T> {
    let raw = value?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(key, value = %raw, "Invalid numeric config value, using default");
            None
        }
    }
}
