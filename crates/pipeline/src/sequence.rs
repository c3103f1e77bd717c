//! Shot generation for a whole plan or a single shot.

use std::path::Path;

use storyframe_core::error::CoreError;
use storyframe_core::generation::ImageGenerator;
use storyframe_core::payload::build_payload;
use storyframe_core::plan::{ProjectPlan, ShotSpec};
use storyframe_core::shot_output::ShotOutput;
use tokio_util::sync::CancellationToken;

/// Progress callback invoked before each shot with
/// `(index, total, shot_id)`.
pub type ProgressFn<'a> = &'a (dyn Fn(usize, usize, &str) + Send + Sync);

/// Suffix appended to the shot id of a refinement render.
pub const REFINED_SUFFIX: &str = "_refined";

/// Generate every shot of `plan` in order.
///
/// Returns one [`ShotOutput`] per shot, carrying the shot's context, its
/// payload, and the generation status. Failures are recorded on the
/// entry and never stop the sequence. `reference_image` marks a
/// pre-existing reference: every entry then reports `used_reference`.
pub async fn generate_sequence<G: ImageGenerator>(
    plan: &ProjectPlan,
    generator: &G,
    reference_image: Option<&Path>,
    progress: Option<ProgressFn<'_>>,
) -> Vec<ShotOutput> {
    generate_shots(
        plan,
        generator,
        reference_image,
        progress,
        &CancellationToken::new(),
    )
    .await
}

/// [`generate_sequence`] that stops between shots once `cancel` fires.
///
/// Entries for shots not yet started are omitted.
pub(crate) async fn generate_shots<G: ImageGenerator>(
    plan: &ProjectPlan,
    generator: &G,
    reference_image: Option<&Path>,
    progress: Option<ProgressFn<'_>>,
    cancel: &CancellationToken,
) -> Vec<ShotOutput> {
    let total = plan.shots.len();
    let mut outputs = Vec::with_capacity(total);

    tracing::info!(
        project_id = %plan.project_id,
        total,
        has_reference = reference_image.is_some(),
        "Starting sequence generation",
    );

    for (index, shot) in plan.shots.iter().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!(
                project_id = %plan.project_id,
                generated = index,
                total,
                "Sequence generation cancelled",
            );
            break;
        }

        if let Some(progress) = progress {
            progress(index, total, &shot.shot_id);
        }

        let mut output = render_shot(plan, shot, &shot.shot_id, generator).await;
        output.used_reference = index > 0 || reference_image.is_some();
        outputs.push(output);
    }

    outputs
}

/// Render `shot` once more under `<shot_id>_refined`, leaving the original
/// artifact in place.
pub async fn refine_shot<G: ImageGenerator>(
    plan: &ProjectPlan,
    shot_id: &str,
    generator: &G,
) -> Result<ShotOutput, CoreError> {
    let shot = plan.find_shot(shot_id).ok_or_else(|| CoreError::NotFound {
        entity: "shot",
        id: shot_id.to_string(),
    })?;

    tracing::info!(shot_id, "Refining shot");

    let render_id = format!("{shot_id}{REFINED_SUFFIX}");
    let mut output = render_shot(plan, shot, &render_id, generator).await;
    output.refined = true;
    Ok(output)
}

async fn render_shot<G: ImageGenerator>(
    plan: &ProjectPlan,
    shot: &ShotSpec,
    render_id: &str,
    generator: &G,
) -> ShotOutput {
    let payload = build_payload(&plan.continuity_map, shot);
    let outcome = generator
        .generate(&payload, &plan.project_id, render_id)
        .await;

    if let Some(error) = outcome.error() {
        tracing::warn!(shot_id = %shot.shot_id, status = ?outcome.status(), error, "Shot generation did not succeed");
    }

    let mut output = ShotOutput::from_shot(shot);
    output.record_outcome(&outcome);
    output.payload = Some(payload);
    output
}
