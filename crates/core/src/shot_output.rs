//! Per-shot generation results and their continuity annotations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::generation::{GenerationOutcome, GenerationStatus};
use crate::payload::GenerationPayload;
use crate::plan::{ParamGroup, ShotSpec};

/// One generated image in a sequence.
///
/// Created by sequence generation, annotated in place by the continuity
/// validator and the auto-fix loop, then persisted by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShotOutput {
    pub shot_id: String,
    #[serde(default)]
    pub shot_type: String,
    #[serde(default)]
    pub shot_role: String,
    #[serde(default)]
    pub framing: String,
    #[serde(default)]
    pub camera_angle: String,
    #[serde(default)]
    pub description: String,
    /// Rendered artifact; absent when generation produced nothing.
    #[serde(default)]
    pub image_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<GenerationPayload>,
    #[serde(default)]
    pub camera_overrides: ParamGroup,
    #[serde(default)]
    pub composition_overrides: ParamGroup,
    #[serde(default)]
    pub notes: ParamGroup,
    #[serde(default)]
    pub status: Option<GenerationStatus>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub used_reference: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub refined: bool,

    /// Similarity to the reference shot in `[0, 1]`; higher is closer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuity_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub continuity_ok: Option<bool>,
    /// Raw Euclidean HSV distance from the reference shot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_diff: Option<f64>,
    /// Set only by the auto-fix loop after a successful regeneration.
    #[serde(default)]
    pub re_rendered: bool,
}

impl ShotOutput {
    /// Bare output carrying only an id and an optional artifact path.
    pub fn new(shot_id: impl Into<String>, image_path: Option<PathBuf>) -> Self {
        Self {
            shot_id: shot_id.into(),
            image_path,
            ..Default::default()
        }
    }

    /// Output pre-filled with the context of the shot it was generated from.
    pub fn from_shot(shot: &ShotSpec) -> Self {
        Self {
            shot_id: shot.shot_id.clone(),
            shot_type: shot.shot_type.clone(),
            shot_role: shot.shot_role.clone(),
            framing: shot.framing.clone(),
            camera_angle: shot.camera_angle.clone(),
            description: shot.description.clone(),
            camera_overrides: shot.camera_overrides.clone(),
            composition_overrides: shot.composition_overrides.clone(),
            notes: shot.notes.clone(),
            ..Default::default()
        }
    }

    /// Record the artifact, status, and error of a generation attempt.
    pub fn record_outcome(&mut self, outcome: &GenerationOutcome) {
        self.image_path = outcome.image_path().map(PathBuf::from);
        self.status = Some(outcome.status());
        self.error = outcome.error().map(str::to_string);
    }

    /// `true` when the shot has been scored and failed the tolerance check.
    pub fn is_failing(&self) -> bool {
        self.continuity_ok == Some(false)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
