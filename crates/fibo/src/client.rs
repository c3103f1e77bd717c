//! [`ImageGenerator`] implementation backed by the FIBO API.
//!
//! A generation runs submit → (poll) → download → re-encode as PNG at
//! `<output_dir>/<project_id>/shot_<shot_id>.png`. Without a configured
//! key the client writes a placeholder instead and reports
//! [`GenerationOutcome::Offline`]; on any error a placeholder is written
//! at the same path and the failure is reported with a user-facing
//! reason. Placeholders never replace an image that is already on disk.

use std::path::{Path, PathBuf};

use storyframe_core::generation::{GenerationOutcome, ImageGenerator};
use storyframe_core::payload::GenerationPayload;

use crate::api::{FiboApi, FiboApiError, GenerateRequest};
use crate::config::FiboConfig;
use crate::placeholder::write_placeholder;
use crate::poll::{poll_for_result, PollConfig};
use crate::response::{extract_image_url, status_url};

const OFFLINE_KEPT_REASON: &str =
    "Image generation is offline; the existing image was kept.";

/// Text-to-image client for a single FIBO endpoint.
pub struct FiboClient {
    /// `None` in offline mode.
    api: Option<FiboApi>,
    output_dir: PathBuf,
    poll: PollConfig,
}

impl FiboClient {
    /// Build a client from configuration.
    ///
    /// Falls back to offline mode when no key is configured or the HTTP
    /// client cannot be constructed.
    pub fn new(config: FiboConfig) -> Self {
        let api = match (config.is_online(), config.api_key) {
            (true, Some(key)) => {
                match FiboApi::new(config.api_url, key, config.request_timeout) {
                    Ok(api) => Some(api),
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to build FIBO HTTP client, running offline");
                        None
                    }
                }
            }
            _ => {
                tracing::warn!("FIBO_API_KEY not set, generating placeholder images");
                None
            }
        };

        Self {
            api,
            output_dir: config.output_dir,
            poll: config.poll,
        }
    }

    pub fn is_offline(&self) -> bool {
        self.api.is_none()
    }

    /// Artifact location for a shot. A successful regeneration overwrites it.
    pub fn target_path(&self, project_id: &str, shot_id: &str) -> PathBuf {
        self.output_dir
            .join(project_id)
            .join(format!("shot_{shot_id}.png"))
    }

    async fn try_generate(
        &self,
        api: &FiboApi,
        payload: &GenerationPayload,
        target: &Path,
    ) -> Result<(), FiboApiError> {
        tracing::info!(api_url = api.api_url(), target = %target.display(), "Submitting generation request");

        let mut data = api.submit(&GenerateRequest::from(payload)).await?;

        if extract_image_url(&data).is_none() {
            if let Some(url) = status_url(&data).map(str::to_owned) {
                tracing::info!("Async response detected, polling status_url");
                data = poll_for_result(api, &url, &self.poll).await?;
            }
        }

        let image_url = extract_image_url(&data)
            .ok_or_else(|| FiboApiError::MissingImageUrl(data.to_string()))?
            .to_owned();

        let bytes = api.download(&image_url).await?;
        let target = target.to_path_buf();
        tokio::task::spawn_blocking(move || save_png(&bytes, &target)).await??;
        Ok(())
    }
}

/// Decode downloaded bytes and re-encode them as PNG at `target`.
fn save_png(bytes: &[u8], target: &Path) -> Result<(), FiboApiError> {
    let image = image::load_from_memory(bytes)?;
    if let Some(parent) = target.parent() {
        std::fs::create_dir_all(parent)?;
    }
    image.save_with_format(target, image::ImageFormat::Png)?;
    Ok(())
}

/// Write a placeholder at `target` unless an artifact is already there.
///
/// Returns the placeholder path when one was written. A failed or offline
/// regeneration keeps the last good artifact in place.
fn placeholder_if_absent(target: &Path, shot_id: &str) -> Result<Option<PathBuf>, FiboApiError> {
    if target.exists() {
        tracing::warn!(shot_id, path = %target.display(), "Keeping existing image, no placeholder written");
        return Ok(None);
    }
    write_placeholder(target)?;
    Ok(Some(target.to_path_buf()))
}

impl ImageGenerator for FiboClient {
    async fn generate(
        &self,
        payload: &GenerationPayload,
        project_id: &str,
        shot_id: &str,
    ) -> GenerationOutcome {
        let target = self.target_path(project_id, shot_id);

        let Some(api) = &self.api else {
            return match placeholder_if_absent(&target, shot_id) {
                Ok(Some(image_path)) => GenerationOutcome::Offline { image_path },
                Ok(None) => GenerationOutcome::Failed {
                    image_path: None,
                    reason: OFFLINE_KEPT_REASON.to_owned(),
                },
                Err(e) => {
                    tracing::error!(shot_id, error = %e, "Failed to write offline placeholder");
                    GenerationOutcome::Failed {
                        image_path: None,
                        reason: e.user_message(),
                    }
                }
            };
        };

        match self.try_generate(api, payload, &target).await {
            Ok(()) => {
                tracing::info!(shot_id, path = %target.display(), "Generated image");
                GenerationOutcome::Success { image_path: target }
            }
            Err(e) => {
                tracing::error!(shot_id, error = %e, "Error generating image");
                let image_path = placeholder_if_absent(&target, shot_id).unwrap_or_else(|pe| {
                    tracing::error!(shot_id, error = %pe, "Failed to write error placeholder");
                    None
                });
                GenerationOutcome::Failed {
                    image_path,
                    reason: e.user_message(),
                }
            }
        }
    }
}
