//! REST API client for the FIBO text-to-image endpoints.
//!
//! Wraps job submission, status retrieval, and result download using
//! [`reqwest`]. Every request carries the `api_token` header.

use std::time::Duration;

use serde::Serialize;
use storyframe_core::payload::GenerationPayload;

/// HTTP client for a single FIBO endpoint.
pub struct FiboApi {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Request body sent to the generate endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<&'a str>,
    /// Reference image for guided generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_images: Option<u32>,
}

impl<'a> From<&'a GenerationPayload> for GenerateRequest<'a> {
    fn from(payload: &'a GenerationPayload) -> Self {
        Self {
            prompt: &payload.prompt,
            negative_prompt: Some(payload.negative_prompt.as_str()).filter(|s| !s.is_empty()),
            image_url: payload.image_url.as_deref(),
            aspect_ratio: payload.aspect_ratio.as_deref(),
            num_images: payload.num_images,
        }
    }
}

/// Errors from the FIBO API layer.
#[derive(Debug, thiserror::Error)]
pub enum FiboApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("FIBO API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A status poll reported a terminal failure.
    #[error("API generation failed: {0}")]
    GenerationFailed(String),

    #[error("Polling timed out after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    #[error("No image URL found in response: {0}")]
    MissingImageUrl(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl FiboApiError {
    /// Short explanation suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::ApiError { status: 401, .. } => {
                "API key invalid or expired. Please check your FIBO_API_KEY.".to_string()
            }
            Self::ApiError { status: 422, .. } => {
                "Invalid request format. The prompt may contain unsupported content.".to_string()
            }
            Self::ApiError { status: 429, .. } => {
                "Rate limit exceeded. Please wait a moment and try again.".to_string()
            }
            Self::ApiError {
                status: 500..=599, ..
            } => "API server error. Please try again later.".to_string(),
            Self::Request(e) if e.is_timeout() => {
                "Request timed out. The server may be busy.".to_string()
            }
            Self::PollTimeout { .. } => "Request timed out. The server may be busy.".to_string(),
            other => other.to_string(),
        }
    }
}

impl FiboApi {
    /// Create a new API client.
    ///
    /// * `api_url` - Full URL of the generate endpoint.
    /// * `timeout` - Applied to every request made by this client.
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Result<Self, FiboApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, api_url, api_key))
    }

    /// Create an API client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Submit a generation job. Returns the raw response body, which may
    /// hold the image URL directly or a `status_url` to poll.
    pub async fn submit(
        &self,
        request: &GenerateRequest<'_>,
    ) -> Result<serde_json::Value, FiboApiError> {
        let response = self
            .client
            .post(&self.api_url)
            .header("api_token", self.api_key.as_str())
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of an asynchronous job.
    pub async fn get_status(&self, status_url: &str) -> Result<serde_json::Value, FiboApiError> {
        let response = self
            .client
            .get(status_url)
            .header("api_token", self.api_key.as_str())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download the raw bytes of a generated image.
    pub async fn download(&self, image_url: &str) -> Result<Vec<u8>, FiboApiError> {
        let response = self.client.get(image_url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, capturing the body
    /// text in a [`FiboApiError::ApiError`] otherwise.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, FiboApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::error!(status = status.as_u16(), body = %body, "FIBO API error");
            return Err(FiboApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response(
        response: reqwest::Response,
    ) -> Result<serde_json::Value, FiboApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use storyframe_core::payload::build_payload;
    use storyframe_core::plan::{default_continuity_map, ShotSpec};

    use super::*;

    fn sample_payload() -> GenerationPayload {
        let map = default_continuity_map("cont_test");
        build_payload(&map, &ShotSpec::new("shot_001", "wide", "A city street"))
    }

    // -- GenerateRequest -----------------------------------------------------

    #[test]
    fn request_omits_absent_fields() {
        let payload = sample_payload();
        let body = serde_json::to_value(GenerateRequest::from(&payload)).unwrap();

        assert_eq!(body["prompt"], payload.prompt.as_str());
        assert_eq!(body["negative_prompt"], payload.negative_prompt.as_str());
        assert!(body.get("image_url").is_none());
        assert!(body.get("aspect_ratio").is_none());
        assert!(body.get("num_images").is_none());
        assert!(body.get("structured_params").is_none());
    }

    #[test]
    fn request_carries_optional_fields() {
        let mut payload = sample_payload();
        payload.negative_prompt.clear();
        payload.image_url = Some("https://cdn/ref.png".into());
        payload.aspect_ratio = Some("16:9".into());
        payload.num_images = Some(2);

        let body = serde_json::to_value(GenerateRequest::from(&payload)).unwrap();

        assert!(body.get("negative_prompt").is_none());
        assert_eq!(body["image_url"], "https://cdn/ref.png");
        assert_eq!(body["aspect_ratio"], "16:9");
        assert_eq!(body["num_images"], 2);
    }

    // -- user_message --------------------------------------------------------

    fn api_error(status: u16) -> FiboApiError {
        FiboApiError::ApiError {
            status,
            body: "{}".into(),
        }
    }

    #[test]
    fn user_message_by_status() {
        assert!(api_error(401).user_message().contains("FIBO_API_KEY"));
        assert!(api_error(422).user_message().starts_with("Invalid request format"));
        assert!(api_error(429).user_message().starts_with("Rate limit exceeded"));
        assert!(api_error(500).user_message().starts_with("API server error"));
        assert!(api_error(503).user_message().starts_with("API server error"));
    }

    #[test]
    fn user_message_falls_back_to_display() {
        let err = api_error(404);
        assert_eq!(err.user_message(), err.to_string());

        let missing = FiboApiError::MissingImageUrl("{}".into());
        assert_eq!(missing.user_message(), "No image URL found in response: {}");
    }

    #[test]
    fn poll_timeout_reads_as_busy_server() {
        let err = FiboApiError::PollTimeout { attempts: 30 };
        assert_eq!(err.user_message(), "Request timed out. The server may be busy.");
    }
}
