//! Integration tests for the generate → validate → auto-fix run.

mod common;

use common::{plan_with_shots, FakeGenerator, Step, GRAY, WHITE};
use storyframe_continuity::ContinuitySummary;
use storyframe_core::continuity::CONTINUITY_HINT;
use storyframe_pipeline::{run_storyboard, RunOptions};
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Test: full run with repair
// ---------------------------------------------------------------------------

#[tokio::test]
async fn outlier_is_repaired_by_auto_fix() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = plan_with_shots(&["shot_001", "shot_002", "shot_003"]);
    let generator = FakeGenerator::new(dir.path(), Step::Solid(GRAY))
        .steps("shot_003", vec![Step::Solid(WHITE), Step::Solid(GRAY)]);

    let report = run_storyboard(
        &plan,
        &generator,
        &RunOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .await;

    assert_eq!(
        report.summary,
        ContinuitySummary {
            total: 3,
            passed: 3,
            re_rendered: 1,
            ..Default::default()
        }
    );
    let auto_fix = report.auto_fix.expect("auto-fix ran");
    assert_eq!(auto_fix.repaired, 1);
    assert!(!report.cancelled);

    let calls = generator.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(calls[3].0, "shot_003");
    assert_eq!(calls[3].1, format!("Scene for shot_003{CONTINUITY_HINT}"));
    assert_eq!(plan.shots[2].description, "Scene for shot_003");
}

#[tokio::test]
async fn auto_fix_disabled_only_validates() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = plan_with_shots(&["shot_001", "shot_002"]);
    let generator = FakeGenerator::new(dir.path(), Step::Solid(GRAY))
        .steps("shot_002", vec![Step::Solid(WHITE)]);
    let options = RunOptions {
        auto_fix: false,
        ..Default::default()
    };

    let report =
        run_storyboard(&plan, &generator, &options, None, &CancellationToken::new()).await;

    assert!(report.auto_fix.is_none());
    assert_eq!(report.summary.failed, 1);
    assert_eq!(report.outputs[1].continuity_ok, Some(false));
    assert_eq!(generator.calls().len(), 2);
}

#[tokio::test]
async fn strict_tolerance_flows_into_validation() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = plan_with_shots(&["shot_001", "shot_002"]);
    let generator = FakeGenerator::new(dir.path(), Step::Solid(GRAY))
        .steps("shot_002", vec![Step::Solid([148, 148, 148])]);
    let options = RunOptions {
        tolerance: Some(0.05),
        auto_fix: false,
        ..Default::default()
    };

    let report =
        run_storyboard(&plan, &generator, &options, None, &CancellationToken::new()).await;

    assert_eq!(report.outputs[1].continuity_ok, Some(false));
}

// ---------------------------------------------------------------------------
// Test: reference image style
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reference_style_overrides_palette_and_lighting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let reference = dir.path().join("ref.png");
    image::RgbImage::from_pixel(16, 16, image::Rgb([190, 195, 250]))
        .save(&reference)
        .expect("write reference");
    let plan = plan_with_shots(&["shot_001", "shot_002"]);
    let generator = FakeGenerator::new(dir.path(), Step::Solid(GRAY));
    let options = RunOptions {
        reference_image: Some(reference),
        ..Default::default()
    };

    let report =
        run_storyboard(&plan, &generator, &options, None, &CancellationToken::new()).await;

    let payloads = generator.payloads();
    assert_eq!(payloads.len(), 2);
    for payload in &payloads {
        let params = &payload.structured_params;
        assert_eq!(params.global_style["color_palette"], "noir");
        assert_eq!(params.global_style["look"], "cinematic");
        assert_eq!(params.lighting["temperature_k"], 6500);
        assert!(payload.prompt.contains("noir"));
    }
    assert!(report.outputs.iter().all(|o| o.used_reference));
    let notes = report.reference_style.expect("reference style");
    assert!(notes.starts_with("Style from ref.png. Palette: noir."));
    assert_eq!(plan.continuity_map.global_style["color_palette"], "warm_muted");
}

#[tokio::test]
async fn unreadable_reference_keeps_plan_style() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = plan_with_shots(&["shot_001"]);
    let generator = FakeGenerator::new(dir.path(), Step::Solid(GRAY));
    let options = RunOptions {
        reference_image: Some(dir.path().join("missing.png")),
        ..Default::default()
    };

    let report =
        run_storyboard(&plan, &generator, &options, None, &CancellationToken::new()).await;

    assert!(report.reference_style.is_none());
    assert_eq!(
        generator.payloads()[0].structured_params.global_style["color_palette"],
        "warm_muted"
    );
    assert!(report.outputs[0].used_reference);
}

// ---------------------------------------------------------------------------
// Test: cancellation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cancel_during_generation_stops_between_shots() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = plan_with_shots(&["shot_001", "shot_002", "shot_003"]);
    let cancel = CancellationToken::new();
    let generator =
        FakeGenerator::new(dir.path(), Step::Solid(GRAY)).cancel_after(2, cancel.clone());

    let report = run_storyboard(&plan, &generator, &RunOptions::default(), None, &cancel).await;

    assert!(report.cancelled);
    assert_eq!(report.outputs.len(), 2);
    assert!(report.auto_fix.is_none());
    // What was produced is still validated.
    assert_eq!(report.summary.passed, 2);
}

#[tokio::test]
async fn report_serializes_outputs_and_summary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let plan = plan_with_shots(&["shot_001"]);
    let generator = FakeGenerator::new(dir.path(), Step::Solid(GRAY));

    let report = run_storyboard(
        &plan,
        &generator,
        &RunOptions::default(),
        None,
        &CancellationToken::new(),
    )
    .await;
    let json = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["project_id"], "proj_pipe");
    assert_eq!(json["outputs"][0]["status"], "success");
    assert_eq!(json["outputs"][0]["continuity_ok"], true);
    assert_eq!(json["summary"]["total"], 1);
    assert_eq!(json["auto_fix"]["failing"], 0);
}
