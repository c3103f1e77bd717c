//! End-to-end storyboard run: generate, validate, auto-fix.
//!
//! A reference image, when supplied, is reduced to a [`StyleParams`] set
//! that is laid over a copy of the plan's continuity map before any shot
//! is rendered. The caller's plan is never modified.

use std::borrow::Cow;
use std::path::PathBuf;

use serde::Serialize;
use storyframe_continuity::{
    apply_style, auto_fix_continuity, extract_style_offloaded, summarize,
    validate_continuity_offloaded, AutoFixReport, ContinuitySummary, StyleParams,
};
use storyframe_core::generation::ImageGenerator;
use storyframe_core::plan::ProjectPlan;
use storyframe_core::shot_output::ShotOutput;
use tokio_util::sync::CancellationToken;

use crate::sequence::{generate_shots, ProgressFn};

/// Knobs for a storyboard run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Continuity tolerance override; `None` uses the default.
    pub tolerance: Option<f64>,
    /// Run the auto-fix sweep after validation.
    pub auto_fix: bool,
    /// Pre-existing reference image supplied by the user. Its extracted
    /// style overrides the palette and lighting of the continuity map.
    pub reference_image: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            tolerance: None,
            auto_fix: true,
            reference_image: None,
        }
    }
}

/// Everything a run produced, in the shape persisted to disk.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub project_id: String,
    pub outputs: Vec<ShotOutput>,
    pub summary: ContinuitySummary,
    /// `None` when auto-fix was disabled or skipped.
    pub auto_fix: Option<AutoFixReport>,
    /// Notes describing the style taken from the reference image.
    pub reference_style: Option<String>,
    /// Generation stopped before every shot was rendered.
    pub cancelled: bool,
}

/// Generate the whole plan, validate continuity, and optionally repair
/// failing shots.
///
/// Cancellation is honoured between shots. A run cancelled during
/// generation still validates what was produced but skips auto-fix. An
/// unreadable reference image is logged and the plan's own style is used.
pub async fn run_storyboard<G: ImageGenerator>(
    plan: &ProjectPlan,
    generator: &G,
    options: &RunOptions,
    progress: Option<ProgressFn<'_>>,
    cancel: &CancellationToken,
) -> RunReport {
    let style = match &options.reference_image {
        Some(path) => extract_style_offloaded(path.clone())
            .await
            .map(|dna| dna.params()),
        None => None,
    };
    let styled = styled_plan(plan, style.as_ref());
    let plan = &*styled;

    let mut outputs = generate_shots(
        plan,
        generator,
        options.reference_image.as_deref(),
        progress,
        cancel,
    )
    .await;
    let mut cancelled = outputs.len() < plan.shots.len();

    let auto_fix = if options.auto_fix && !cancelled {
        let report =
            auto_fix_continuity(plan, &mut outputs, generator, options.tolerance, cancel).await;
        cancelled = report.cancelled;
        Some(report)
    } else {
        validate_continuity_offloaded(&mut outputs, options.tolerance).await;
        None
    };

    let summary = summarize(&outputs);
    tracing::info!(
        project_id = %plan.project_id,
        total = summary.total,
        passed = summary.passed,
        failed = summary.failed,
        re_rendered = summary.re_rendered,
        cancelled,
        "Storyboard run complete",
    );

    RunReport {
        project_id: plan.project_id.clone(),
        outputs,
        summary,
        auto_fix,
        reference_style: style.map(|s| s.notes),
        cancelled,
    }
}

/// The plan to render: `plan` itself, or a copy whose continuity map
/// carries the reference style.
fn styled_plan<'a>(plan: &'a ProjectPlan, style: Option<&StyleParams>) -> Cow<'a, ProjectPlan> {
    match style {
        Some(params) => {
            tracing::info!(
                project_id = %plan.project_id,
                notes = %params.notes,
                "Applying reference style to continuity map",
            );
            let mut styled = plan.clone();
            styled.continuity_map = apply_style(&plan.continuity_map, params);
            Cow::Owned(styled)
        }
        None => Cow::Borrowed(plan),
    }
}
