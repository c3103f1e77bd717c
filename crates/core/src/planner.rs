//! Template-based shot planning from a free-text brief.
//!
//! Builds a complete [`ProjectPlan`] without a language model: a
//! mode-specific continuity baseline plus shots that cycle through a fixed
//! template list. Shots share the baseline and vary only camera angle,
//! framing and composition.

use std::ops::RangeInclusive;

use serde_json::json;
use uuid::Uuid;

use crate::error::CoreError;
use crate::plan::{object, ContinuityMap, ParamGroup, ProjectMode, ProjectPlan, ShotSpec};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Shot count used when the caller does not ask for one.
pub const DEFAULT_SHOT_COUNT: usize = 5;

/// Accepted number of shots per plan.
pub const SHOT_COUNT_RANGE: RangeInclusive<usize> = 3..=8;

/// Brief prefix carrying a character description, e.g.
/// `[CHARACTER: a red-haired courier] Night chase through the market`.
pub const CHARACTER_PREFIX: &str = "[CHARACTER:";

struct ShotTemplate {
    shot_type: &'static str,
    description: &'static str,
    /// `None` derives the role from `shot_type`.
    role: Option<&'static str>,
    framing: &'static str,
    angle: &'static str,
    rule: &'static str,
}

const fn product(shot_type: &'static str, description: &'static str) -> ShotTemplate {
    ShotTemplate {
        shot_type,
        description,
        role: None,
        framing: "medium",
        angle: "eye_level",
        rule: "centered",
    }
}

const fn cinematic(
    shot_type: &'static str,
    description: &'static str,
    role: &'static str,
    framing: &'static str,
    angle: &'static str,
    rule: &'static str,
) -> ShotTemplate {
    ShotTemplate {
        shot_type,
        description,
        role: Some(role),
        framing,
        angle,
        rule,
    }
}

const PRODUCT_TEMPLATES: &[ShotTemplate] = &[
    product("hero_shot", "Hero shot of the product, fully lit, on a clean background."),
    product("detail_shot", "Close-up detail shot emphasizing texture and material quality."),
    product("lifestyle_context", "The product placed in a stylized environment context."),
    product("packaging_shot", "The product alongside its packaging, elegant arrangement."),
    product("top_down", "Top-down flat lay view of the product elements."),
];

const STORYBOARD_TEMPLATES: &[ShotTemplate] = &[
    cinematic(
        "wide_establishing",
        "Wide establishing shot setting the scene with street background and atmosphere, showing the full environment.",
        "Wide hero introduction",
        "wide",
        "low_angle",
        "wide_establishing",
    ),
    cinematic(
        "medium_character",
        "Medium shot focusing on the main subject with clear expression and interaction, tighter crop on character.",
        "Medium character affirmation",
        "medium",
        "eye_level",
        "centered",
    ),
    cinematic(
        "over_the_shoulder",
        "Over-the-shoulder perspective looking at the point of interest, adding depth.",
        "POV transition",
        "medium",
        "eye_level",
        "rule_of_thirds",
    ),
    cinematic(
        "close_up",
        "Close-up on the subject's face or key detail, emotional and expressive focus.",
        "Emotional close-up",
        "close_up",
        "eye_level",
        "golden_ratio",
    ),
    cinematic(
        "low_angle_hero",
        "Low angle shot looking up at the subject, creating a sense of power and importance.",
        "Hero power shot",
        "medium",
        "low_angle",
        "rule_of_thirds",
    ),
    cinematic(
        "high_angle_context",
        "High angle view providing environmental context and scale.",
        "Context overview",
        "wide",
        "high_angle",
        "rule_of_thirds",
    ),
    cinematic(
        "dutch_angle",
        "Dynamic dutch angle adding energy and visual interest.",
        "Dynamic action",
        "medium",
        "dutch",
        "rule_of_thirds",
    ),
    cinematic(
        "extreme_closeup",
        "Extreme close-up on a key detail or expression.",
        "Detail emphasis",
        "extreme_closeup",
        "eye_level",
        "centered",
    ),
];

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// Plan a new project under a fresh time-ordered id.
pub fn generate_project_plan(
    brief: &str,
    mode: ProjectMode,
    num_shots: usize,
) -> Result<ProjectPlan, CoreError> {
    template_plan(Uuid::now_v7().to_string(), brief, mode, num_shots)
}

/// Filesystem-safe project id derived from a brief.
///
/// Keeps the first five alphanumeric words, lowercased and joined with
/// `_`, then appends eight random hex digits. An empty prefix becomes
/// `project`.
pub fn project_id_from_brief(brief: &str) -> String {
    let cleaned: String = brief
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect();
    let prefix = cleaned
        .split_whitespace()
        .take(5)
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    let prefix = if prefix.is_empty() { "project".to_string() } else { prefix };

    // The tail of a v7 id is random; the head is a millisecond timestamp.
    let id = Uuid::now_v7().simple().to_string();
    format!("{prefix}_{}", &id[id.len() - 8..])
}

/// Plan a project under a caller-chosen id.
///
/// The continuity id equals the project id. Shots are numbered
/// `shot_001`, `shot_002`, ... and cycle through the mode's templates.
pub fn template_plan(
    project_id: impl Into<String>,
    brief: &str,
    mode: ProjectMode,
    num_shots: usize,
) -> Result<ProjectPlan, CoreError> {
    if !SHOT_COUNT_RANGE.contains(&num_shots) {
        return Err(CoreError::Validation(format!(
            "num_shots must be between {} and {}, got {num_shots}",
            SHOT_COUNT_RANGE.start(),
            SHOT_COUNT_RANGE.end()
        )));
    }

    let project_id = project_id.into();
    let templates = match mode {
        ProjectMode::Product => PRODUCT_TEMPLATES,
        ProjectMode::Storyboard => STORYBOARD_TEMPLATES,
    };
    let shots = (0..num_shots)
        .map(|i| shot_from_template(i, &templates[i % templates.len()], brief))
        .collect();

    let plan = ProjectPlan {
        continuity_map: baseline_for(mode, project_id.clone()),
        project_id,
        mode,
        brief: brief.to_string(),
        shots,
    };
    plan.validate()?;
    Ok(plan)
}

fn shot_from_template(index: usize, template: &ShotTemplate, brief: &str) -> ShotSpec {
    let mut camera_overrides = ParamGroup::new();
    camera_overrides.insert("angle".into(), json!(template.angle));
    if let Some((lens_mm, fov_degrees)) = framing_lens(template.framing) {
        camera_overrides.insert("lens_mm".into(), json!(lens_mm));
        camera_overrides.insert("fov_degrees".into(), json!(fov_degrees));
    }

    let mut composition_overrides = ParamGroup::new();
    composition_overrides.insert("rule".into(), json!(template.rule));

    ShotSpec {
        shot_id: format!("shot_{:03}", index + 1),
        shot_type: template.shot_type.to_string(),
        description: shot_description(template.description, brief),
        shot_role: template
            .role
            .map_or_else(|| title_case(template.shot_type), str::to_string),
        framing: template.framing.to_string(),
        camera_angle: template.angle.to_string(),
        camera_overrides,
        composition_overrides,
        notes: object(json!({
            "continuity_kept": ["palette", "lighting", "time_of_day"],
            "varied": ["camera_angle", "composition"],
        })),
    }
}

/// Lens and field of view forced by a framing, if any.
fn framing_lens(framing: &str) -> Option<(f64, f64)> {
    match framing {
        "wide" => Some((24.0, 70.0)),
        "close_up" => Some((85.0, 25.0)),
        "extreme_closeup" => Some((100.0, 18.0)),
        _ => None,
    }
}

/// Merge the brief into a template description.
///
/// A brief carrying a [`CHARACTER_PREFIX`] block puts the character first
/// so every shot opens with the same subject.
pub fn shot_description(base: &str, brief: &str) -> String {
    if let Some(rest) = brief.strip_prefix(CHARACTER_PREFIX) {
        if let Some((character, scene)) = rest.split_once(']') {
            return format!("{}. {base} Scene: {}", character.trim(), scene.trim());
        }
    }
    format!("{base} Context: {brief}")
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn baseline_for(mode: ProjectMode, continuity_id: String) -> ContinuityMap {
    match mode {
        ProjectMode::Product => ContinuityMap {
            continuity_id,
            global_style: object(json!({
                "look": "Studio Product",
                "color_palette": "clean_minimal",
                "hdr": true,
                "bit_depth": "16bit",
            })),
            camera: object(json!({
                "lens_mm": 85.0,
                "fov_degrees": 20.0,
                "height_m": 1.0,
                "angle": "slightly_above",
                "movement": "static",
            })),
            lighting: object(json!({
                "setup": "soft_box",
                "key_direction": "side_left",
                "fill_intensity": 0.8,
                "back_intensity": 0.2,
                "temperature_k": 5500,
            })),
            composition: object(json!({
                "rule": "centered",
                "subject_position": "center",
                "depth_of_field": "deep",
            })),
        },
        ProjectMode::Storyboard => ContinuityMap {
            continuity_id,
            global_style: object(json!({
                "look": "Cinematic",
                "color_palette": "teal_orange",
                "hdr": true,
                "bit_depth": "16bit",
            })),
            camera: object(json!({
                "lens_mm": 35.0,
                "fov_degrees": 50.0,
                "height_m": 1.6,
                "angle": "eye_level",
                "movement": "slow_pan",
            })),
            lighting: object(json!({
                "setup": "cinematic",
                "key_direction": "side",
                "fill_intensity": 0.4,
                "back_intensity": 0.5,
                "temperature_k": 4500,
            })),
            composition: object(json!({
                "rule": "rule_of_thirds",
                "subject_position": "specs",
                "depth_of_field": "shallow",
            })),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
