//! Image-generation seam shared by the pipeline and the continuity core.
//!
//! Defines [`ImageGenerator`], the trait every text-to-image backend
//! implements, and [`GenerationOutcome`], the closed result variant the
//! callers branch on.

use std::future::Future;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::payload::GenerationPayload;

/// Persisted status label for a generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    Success,
    Error,
    OfflinePlaceholder,
}

/// Result of a single text-to-image call.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    /// The image was generated and written to `image_path`.
    Success { image_path: PathBuf },
    /// Generation failed. A placeholder may still have been written.
    Failed {
        image_path: Option<PathBuf>,
        reason: String,
    },
    /// The backend is not configured; a placeholder was written instead.
    Offline { image_path: PathBuf },
}

impl GenerationOutcome {
    pub fn status(&self) -> GenerationStatus {
        match self {
            Self::Success { .. } => GenerationStatus::Success,
            Self::Failed { .. } => GenerationStatus::Error,
            Self::Offline { .. } => GenerationStatus::OfflinePlaceholder,
        }
    }

    /// Path of whatever artifact was written, real or placeholder.
    pub fn image_path(&self) -> Option<&Path> {
        match self {
            Self::Success { image_path } | Self::Offline { image_path } => Some(image_path),
            Self::Failed { image_path, .. } => image_path.as_deref(),
        }
    }

    /// Human-readable failure reason, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            Self::Success { .. } => None,
            Self::Offline { .. } => Some("image generation backend is not configured"),
        }
    }
}

/// Trait implemented by text-to-image backends.
///
/// `shot_id` determines the artifact location, so regenerating a shot
/// overwrites its previous image.
pub trait ImageGenerator: Send + Sync {
    /// Generate one image from `payload` for the given project and shot.
    ///
    /// Never fails at the type level; every error is folded into
    /// [`GenerationOutcome::Failed`].
    fn generate(
        &self,
        payload: &GenerationPayload,
        project_id: &str,
        shot_id: &str,
    ) -> impl Future<Output = GenerationOutcome> + Send;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
