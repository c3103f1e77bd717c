//! Single-pass repair of shots that failed continuity validation.
//!
//! Each failing shot gets exactly one regeneration attempt per call,
//! using a copy of its spec whose description carries the continuity
//! reinforcement clause. The project plan is only borrowed, so the
//! original description cannot leak the clause whatever the attempt's
//! outcome.
//!
//! The sweep is sequential and can be cancelled between shots via a
//! [`CancellationToken`]; a shot already being regenerated is always
//! finished. Image analysis runs on the blocking thread pool.

use serde::Serialize;
use storyframe_core::generation::{GenerationOutcome, GenerationStatus, ImageGenerator};
use storyframe_core::payload::build_payload;
use storyframe_core::plan::ProjectPlan;
use storyframe_core::shot_output::ShotOutput;
use tokio_util::sync::CancellationToken;

use crate::color::analyze_image_offloaded;
use crate::validator::{apply_score, effective_tolerance, validate_continuity_offloaded};

/// Tally of one auto-fix sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoFixReport {
    /// Failing shots found after the initial re-validation.
    pub failing: usize,
    /// Regeneration attempts made (one per failing shot with a spec).
    pub attempted: usize,
    /// Attempts whose regenerated image now passes.
    pub repaired: usize,
    /// Attempts that regenerated an image that still fails.
    pub still_failing: usize,
    /// Attempts where the generator did not report success.
    pub generation_failed: usize,
    /// Failing shots whose spec is no longer in the plan.
    pub skipped_missing_spec: usize,
    /// The sweep stopped early because the token was cancelled.
    pub cancelled: bool,
}

/// Regenerate every failing shot in `outputs` once and re-score it.
///
/// Scores are refreshed first so stale annotations never drive a repair.
/// Repaired entries are re-scored directly against the reference summary
/// from that refresh; the full sequence is not re-validated per shot.
pub async fn auto_fix_continuity<G: ImageGenerator>(
    plan: &ProjectPlan,
    outputs: &mut [ShotOutput],
    generator: &G,
    tolerance: Option<f64>,
    cancel: &CancellationToken,
) -> AutoFixReport {
    let mut report = AutoFixReport::default();
    let tolerance = effective_tolerance(tolerance);

    let Some(reference) = validate_continuity_offloaded(outputs, Some(tolerance)).await else {
        tracing::warn!(
            project_id = %plan.project_id,
            "No reference shot available, skipping continuity auto-fix",
        );
        return report;
    };

    let failing: Vec<usize> = outputs
        .iter()
        .enumerate()
        .filter(|(_, o)| o.is_failing())
        .map(|(i, _)| i)
        .collect();
    report.failing = failing.len();

    for index in failing {
        if cancel.is_cancelled() {
            tracing::info!(
                project_id = %plan.project_id,
                remaining_from = index,
                "Continuity auto-fix cancelled",
            );
            report.cancelled = true;
            break;
        }

        let output = &mut outputs[index];

        let Some(shot) = plan.find_shot(&output.shot_id) else {
            tracing::warn!(
                shot_id = %output.shot_id,
                "No shot spec for failing shot, skipping auto-fix",
            );
            report.skipped_missing_spec += 1;
            continue;
        };

        tracing::info!(
            shot_id = %shot.shot_id,
            score = output.continuity_score.unwrap_or(0.0),
            "Auto-fixing continuity",
        );
        report.attempted += 1;

        let hinted = shot.with_continuity_hint();
        let payload = build_payload(&plan.continuity_map, &hinted);

        match generator
            .generate(&payload, &plan.project_id, &hinted.shot_id)
            .await
        {
            GenerationOutcome::Success { image_path } => {
                let candidate = analyze_image_offloaded(image_path.clone()).await;

                output.image_path = Some(image_path);
                output.payload = Some(payload);
                output.status = Some(GenerationStatus::Success);
                output.error = None;
                output.re_rendered = true;
                apply_score(output, &reference, &candidate, tolerance);

                if output.is_failing() {
                    report.still_failing += 1;
                } else {
                    report.repaired += 1;
                }
                tracing::info!(
                    shot_id = %output.shot_id,
                    score = output.continuity_score.unwrap_or(0.0),
                    ok = !output.is_failing(),
                    "Regenerated shot",
                );
            }
            other => {
                tracing::error!(
                    shot_id = %output.shot_id,
                    status = ?other.status(),
                    error = other.error().unwrap_or("unknown error"),
                    "Failed to auto-fix shot",
                );
                report.generation_failed += 1;
            }
        }
    }

    report
}
