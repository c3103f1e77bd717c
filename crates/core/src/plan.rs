//! Project plan model: the continuity map and the shot list.
//!
//! A [`ProjectPlan`] is produced by the planning front end and read by
//! the generation pipeline. The continuity core only ever borrows it.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::continuity::CONTINUITY_HINT;
use crate::error::CoreError;

/// A group of free-form style parameters (e.g. `{"lens_mm": 50.0}`).
pub type ParamGroup = Map<String, Value>;

/// Whether a plan describes a cinematic storyboard or a product set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectMode {
    Storyboard,
    Product,
}

/// Project-wide baseline style shared read-only by every shot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContinuityMap {
    pub continuity_id: String,
    pub global_style: ParamGroup,
    pub camera: ParamGroup,
    pub lighting: ParamGroup,
    pub composition: ParamGroup,
}

/// The generation request backing one shot in the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotSpec {
    pub shot_id: String,
    pub shot_type: String,
    pub description: String,
    /// Human-readable role label, e.g. "Wide hero introduction".
    #[serde(default)]
    pub shot_role: String,
    #[serde(default = "default_framing")]
    pub framing: String,
    #[serde(default = "default_camera_angle")]
    pub camera_angle: String,
    #[serde(default)]
    pub camera_overrides: ParamGroup,
    #[serde(default)]
    pub composition_overrides: ParamGroup,
    #[serde(default)]
    pub notes: ParamGroup,
}

fn default_framing() -> String {
    "medium".to_string()
}

fn default_camera_angle() -> String {
    "eye_level".to_string()
}

impl ShotSpec {
    /// Minimal shot with defaults for every optional field.
    pub fn new(shot_id: impl Into<String>, shot_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            shot_id: shot_id.into(),
            shot_type: shot_type.into(),
            description: description.into(),
            shot_role: String::new(),
            framing: default_framing(),
            camera_angle: default_camera_angle(),
            camera_overrides: ParamGroup::new(),
            composition_overrides: ParamGroup::new(),
            notes: ParamGroup::new(),
        }
    }

    /// Copy of this shot with the continuity reinforcement clause appended
    /// to its description. `self` is left untouched.
    pub fn with_continuity_hint(&self) -> Self {
        let mut shot = self.clone();
        shot.description.push_str(CONTINUITY_HINT);
        shot
    }
}

/// A complete plan: style baseline plus ordered shots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectPlan {
    pub project_id: String,
    pub mode: ProjectMode,
    pub brief: String,
    pub continuity_map: ContinuityMap,
    pub shots: Vec<ShotSpec>,
}

impl ProjectPlan {
    /// Look up a shot by its identifier.
    pub fn find_shot(&self, shot_id: &str) -> Option<&ShotSpec> {
        self.shots.iter().find(|s| s.shot_id == shot_id)
    }

    /// Check structural invariants: a project id, and non-empty unique
    /// shot ids.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.project_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "project_id must not be empty".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for shot in &self.shots {
            if shot.shot_id.trim().is_empty() {
                return Err(CoreError::Validation(
                    "shot_id must not be empty".to_string(),
                ));
            }
            if !seen.insert(shot.shot_id.as_str()) {
                return Err(CoreError::Validation(format!(
                    "duplicate shot_id '{}'",
                    shot.shot_id
                )));
            }
        }
        Ok(())
    }
}

/// The stock cinematic continuity map used when a plan supplies none.
pub fn default_continuity_map(continuity_id: impl Into<String>) -> ContinuityMap {
    ContinuityMap {
        continuity_id: continuity_id.into(),
        global_style: object(json!({
            "look": "cinematic",
            "color_palette": "warm_muted",
            "hdr": true,
            "bit_depth": "16bit",
        })),
        camera: object(json!({
            "lens_mm": 50.0,
            "fov_degrees": 45.0,
            "height_m": 1.6,
            "angle": "eye_level",
            "movement": "static",
        })),
        lighting: object(json!({
            "setup": "three_point",
            "key_direction": "front_left",
            "fill_intensity": 0.6,
            "back_intensity": 0.4,
            "temperature_k": 5200,
        })),
        composition: object(json!({
            "rule": "rule_of_thirds",
            "subject_position": "center_left",
            "depth_of_field": "shallow",
        })),
    }
}

pub(crate) fn object(value: Value) -> ParamGroup {
    match value {
        Value::Object(map) => map,
        _ => ParamGroup::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
