//! Integration tests for sequence validation against real PNG fixtures.

mod common;

use common::{write_solid_png, GRAY, WHITE};
use storyframe_continuity::{analyze_image, summarize, validate_continuity, ColorSummary};
use storyframe_core::shot_output::ShotOutput;

// ---------------------------------------------------------------------------
// Test: anchoring on shot 0
// ---------------------------------------------------------------------------

/// A copy of the reference scores perfectly; a white frame scores lower.
#[test]
fn identical_shot_scores_one_and_white_scores_lower() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gray = write_solid_png(dir.path(), "ref.png", GRAY);
    let gray_copy = write_solid_png(dir.path(), "copy.png", GRAY);
    let white = write_solid_png(dir.path(), "white.png", WHITE);

    let mut outputs = vec![
        ShotOutput::new("shot_001", Some(gray)),
        ShotOutput::new("shot_002", Some(gray_copy)),
        ShotOutput::new("shot_003", Some(white)),
    ];

    let reference = validate_continuity(&mut outputs, None).expect("reference");

    assert!(reference.saturation < 0.1);
    assert_eq!(outputs[1].continuity_score, Some(1.0));
    assert!(outputs[2].continuity_score.unwrap() < outputs[1].continuity_score.unwrap());
    assert_eq!(outputs[2].continuity_ok, Some(false));

    // Gray value is 128/255; white is 1.0.
    let diff = outputs[2].color_diff.expect("color diff");
    assert!((diff - (1.0 - 128.0 / 255.0)).abs() < 1e-3);
}

/// The reference entry gets well-defined, trivially perfect annotations.
#[test]
fn reference_entry_is_annotated_as_perfect() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gray = write_solid_png(dir.path(), "ref.png", GRAY);

    let mut outputs = vec![ShotOutput::new("shot_001", Some(gray))];
    validate_continuity(&mut outputs, None);

    assert_eq!(outputs[0].continuity_score, Some(1.0));
    assert_eq!(outputs[0].continuity_ok, Some(true));
    assert_eq!(outputs[0].color_diff, Some(0.0));
}

/// A white first shot stays the anchor even when every later shot agrees
/// with each other.
#[test]
fn validator_never_reanchors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let white = write_solid_png(dir.path(), "white.png", WHITE);
    let gray_a = write_solid_png(dir.path(), "a.png", GRAY);
    let gray_b = write_solid_png(dir.path(), "b.png", GRAY);

    let mut outputs = vec![
        ShotOutput::new("shot_001", Some(white)),
        ShotOutput::new("shot_002", Some(gray_a)),
        ShotOutput::new("shot_003", Some(gray_b)),
    ];
    validate_continuity(&mut outputs, None);

    assert_eq!(outputs[0].continuity_ok, Some(true));
    assert_eq!(outputs[1].continuity_ok, Some(false));
    assert_eq!(outputs[2].continuity_ok, Some(false));
}

// ---------------------------------------------------------------------------
// Test: missing and unreadable artifacts
// ---------------------------------------------------------------------------

/// An entry without an image is worst-case whatever the tolerance.
#[test]
fn missing_path_is_worst_case_even_with_max_tolerance() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gray = write_solid_png(dir.path(), "ref.png", GRAY);

    let mut outputs = vec![
        ShotOutput::new("shot_001", Some(gray)),
        ShotOutput::new("shot_002", None),
    ];
    validate_continuity(&mut outputs, Some(1.0));

    assert_eq!(outputs[1].continuity_score, Some(0.0));
    assert_eq!(outputs[1].continuity_ok, Some(false));
    assert!(outputs[1].color_diff.is_none());
}

/// A dangling path is analyzed as the black sentinel and scored normally.
#[test]
fn unreadable_candidate_scores_against_sentinel() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gray = write_solid_png(dir.path(), "ref.png", GRAY);

    let mut outputs = vec![
        ShotOutput::new("shot_001", Some(gray.clone())),
        ShotOutput::new("shot_002", Some(dir.path().join("gone.png"))),
    ];
    validate_continuity(&mut outputs, None);

    let expected = analyze_image(&gray).distance(&ColorSummary::SENTINEL);
    assert_eq!(outputs[1].color_diff, Some(expected));
    assert_eq!(outputs[1].continuity_ok, Some(false));
}

// ---------------------------------------------------------------------------
// Test: tolerance handling
// ---------------------------------------------------------------------------

/// A small brightness shift passes the default tolerance but not a strict one.
#[test]
fn tolerance_override_changes_verdict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gray = write_solid_png(dir.path(), "ref.png", GRAY);
    let lighter = write_solid_png(dir.path(), "lighter.png", [148, 148, 148]);

    let mut outputs = vec![
        ShotOutput::new("shot_001", Some(gray)),
        ShotOutput::new("shot_002", Some(lighter)),
    ];

    validate_continuity(&mut outputs, None);
    assert_eq!(outputs[1].continuity_ok, Some(true));

    validate_continuity(&mut outputs, Some(0.05));
    assert_eq!(outputs[1].continuity_ok, Some(false));
}

/// Re-validation overwrites stale annotations from an earlier pass.
#[test]
fn stale_annotations_are_refreshed() {
    let dir = tempfile::tempdir().expect("tempdir");
    let gray = write_solid_png(dir.path(), "ref.png", GRAY);
    let copy = write_solid_png(dir.path(), "copy.png", GRAY);

    let mut stale = ShotOutput::new("shot_002", Some(copy));
    stale.continuity_score = Some(0.1);
    stale.continuity_ok = Some(false);

    let mut outputs = vec![ShotOutput::new("shot_001", Some(gray)), stale];
    validate_continuity(&mut outputs, None);

    assert_eq!(outputs[1].continuity_ok, Some(true));
    assert_eq!(outputs[1].continuity_score, Some(1.0));
    assert_eq!(
        summarize(&outputs),
        storyframe_continuity::ContinuitySummary {
            total: 2,
            passed: 2,
            ..Default::default()
        }
    );
}
