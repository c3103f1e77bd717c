//! Sequence-wide continuity validation.
//!
//! Shot 0 is the fixed anchor: its image is decoded once, and every shot
//! (shot 0 included, for field completeness) is annotated with its
//! distance, score, and verdict relative to it. The validator never
//! re-anchors to a later shot.

use std::path::Path;

use storyframe_core::continuity::resolve_tolerance;
use storyframe_core::shot_output::ShotOutput;

use crate::color::{analyze_image, ColorSummary};
use crate::scorer::{score, ContinuityScore};

/// Annotate every entry of `outputs` in place against the first entry.
///
/// Returns the reference summary that was used, or `None` when nothing
/// was validated (empty sequence, or the first entry has no image).
/// Entries without an image are scored worst-case (`0.0`, not ok).
pub fn validate_continuity(
    outputs: &mut [ShotOutput],
    tolerance: Option<f64>,
) -> Option<ColorSummary> {
    let first = outputs.first()?;
    let tolerance = effective_tolerance(tolerance);

    let Some(ref_path) = first.image_path.clone() else {
        tracing::warn!(
            shot_id = %first.shot_id,
            "No image path for reference shot, skipping continuity validation",
        );
        return None;
    };

    let reference = analyze_image(&ref_path);

    for (index, output) in outputs.iter_mut().enumerate() {
        if index == 0 {
            annotate(output, &score(&reference, &reference, tolerance));
            continue;
        }
        match output.image_path.clone() {
            Some(path) => rescore(output, &path, &reference, tolerance),
            None => mark_missing(output),
        }
    }

    let failing = outputs.iter().filter(|o| o.is_failing()).count();
    tracing::info!(
        total = outputs.len(),
        failing,
        tolerance,
        reference = %ref_path.display(),
        "Continuity validation complete",
    );

    Some(reference)
}

/// [`validate_continuity`] on the blocking thread pool, for async callers.
///
/// Image decoding is CPU- and disk-bound, so the sequence is annotated on
/// a snapshot off the runtime and copied back. A failed blocking task is
/// logged and leaves `outputs` untouched.
pub async fn validate_continuity_offloaded(
    outputs: &mut [ShotOutput],
    tolerance: Option<f64>,
) -> Option<ColorSummary> {
    let mut snapshot = outputs.to_vec();
    let task = tokio::task::spawn_blocking(move || {
        let reference = validate_continuity(&mut snapshot, tolerance);
        (snapshot, reference)
    });

    match task.await {
        Ok((annotated, reference)) => {
            outputs.clone_from_slice(&annotated);
            reference
        }
        Err(e) => {
            tracing::error!(error = %e, "Continuity validation task failed");
            None
        }
    }
}

/// Resolve an optional override, logging and discarding invalid values.
pub(crate) fn effective_tolerance(tolerance: Option<f64>) -> f64 {
    let (resolved, rejected) = resolve_tolerance(tolerance);
    if let Some(e) = rejected {
        tracing::warn!(error = %e, fallback = resolved, "Ignoring invalid tolerance override");
    }
    resolved
}

/// Score one entry's image at `path` against a known reference summary.
fn rescore(output: &mut ShotOutput, path: &Path, reference: &ColorSummary, tolerance: f64) {
    let candidate = analyze_image(path);
    apply_score(output, reference, &candidate, tolerance);
}

/// Annotate one entry from an already-computed candidate summary.
pub(crate) fn apply_score(
    output: &mut ShotOutput,
    reference: &ColorSummary,
    candidate: &ColorSummary,
    tolerance: f64,
) {
    let result = score(reference, candidate, tolerance);
    tracing::debug!(
        shot_id = %output.shot_id,
        score = result.score,
        distance = result.distance,
        ok = result.ok,
        "Scored shot continuity",
    );
    annotate(output, &result);
}

fn annotate(output: &mut ShotOutput, result: &ContinuityScore) {
    output.continuity_score = Some(result.score);
    output.continuity_ok = Some(result.ok);
    output.color_diff = Some(result.distance);
}

fn mark_missing(output: &mut ShotOutput) {
    tracing::warn!(shot_id = %output.shot_id, "Shot has no image, scoring as worst case");
    output.continuity_score = Some(0.0);
    output.continuity_ok = Some(false);
    output.color_diff = None;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
