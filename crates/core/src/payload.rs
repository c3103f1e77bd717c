//! Generation payload assembly.
//!
//! Merges the project-wide [`ContinuityMap`] with a single shot's
//! description and overrides, then flattens the result into the rich
//! text prompt the text-to-image API consumes. The structured form is
//! carried alongside for logging and persistence.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::plan::{ContinuityMap, ParamGroup, ShotSpec};

/// Negative prompt sent with every generation request.
pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, low quality, distortion, watermark, text, signature, bad anatomy, deformed";

/// Shot identity recorded inside the structured parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub shot_id: String,
    pub shot_type: String,
}

/// Continuity map groups after shot overrides have been applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredParams {
    pub global_style: ParamGroup,
    pub camera: ParamGroup,
    pub lighting: ParamGroup,
    pub composition: ParamGroup,
    pub description: String,
    pub metadata: PayloadMetadata,
}

/// A complete, opaque-to-the-core generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationPayload {
    pub prompt: String,
    pub negative_prompt: String,
    /// Reference image for guided ("inspire") generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_images: Option<u32>,
    pub structured_params: StructuredParams,
}

/// Build the generation payload for `shot` under `continuity_map`.
///
/// Shot overrides win over map values key by key. Neither input is
/// modified.
pub fn build_payload(continuity_map: &ContinuityMap, shot: &ShotSpec) -> GenerationPayload {
    let mut camera = continuity_map.camera.clone();
    camera.extend(shot.camera_overrides.clone());

    let mut composition = continuity_map.composition.clone();
    composition.extend(shot.composition_overrides.clone());

    let params = StructuredParams {
        global_style: continuity_map.global_style.clone(),
        camera,
        lighting: continuity_map.lighting.clone(),
        composition,
        description: shot.description.clone(),
        metadata: PayloadMetadata {
            shot_id: shot.shot_id.clone(),
            shot_type: shot.shot_type.clone(),
        },
    };

    GenerationPayload {
        prompt: compose_prompt(&params),
        negative_prompt: DEFAULT_NEGATIVE_PROMPT.to_string(),
        image_url: None,
        aspect_ratio: None,
        num_images: None,
        structured_params: params,
    }
}

/// Flatten structured parameters into a comma-separated prompt.
fn compose_prompt(params: &StructuredParams) -> String {
    let cam = &params.camera;
    let light = &params.lighting;
    let style = &params.global_style;

    let mut attributes = vec![
        params.description.clone(),
        format!("{}mm lens", param_text(cam, "lens_mm", "50")),
        format!("{} angle", param_text(cam, "angle", "eye_level")),
        format!("{} camera", param_text(cam, "movement", "static")),
        format!("{} lighting", param_text(light, "setup", "three_point")),
        format!("{} light", param_text(light, "key_direction", "front")),
        format!("Style: {}", param_text(style, "look", "cinematic")),
        format!("Palette: {}", param_text(style, "color_palette", "standard")),
    ];

    if style.get("hdr").and_then(Value::as_bool) == Some(true) {
        attributes.push("HDR high dynamic range".to_string());
    }
    if style.get("bit_depth").and_then(Value::as_str) == Some("16bit") {
        attributes.push("16-bit color depth, professional color grading".to_string());
    }

    attributes.join(", ")
}

/// Render a parameter as bare text (strings without JSON quotes).
fn param_text(group: &ParamGroup, key: &str, default: &str) -> String {
    match group.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => default.to_string(),
        Some(other) => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
