//! Continuity constants and tolerance resolution.
//!
//! Tolerances are expressed as raw Euclidean distances between averaged
//! HSV summaries. A shot passes when its distance from the reference is
//! at or below the tolerance.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default maximum acceptable color drift from the reference shot.
pub const DEFAULT_COLOR_TOLERANCE: f64 = 0.15;

/// Clause appended to a shot description when it is regenerated to
/// repair a continuity failure.
pub const CONTINUITY_HINT: &str =
    " with the same warm muted color palette and lighting as the first shot.";

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate that a color tolerance is a finite number in `[0.0, 1.0]`.
pub fn validate_color_tolerance(t: f64) -> Result<(), CoreError> {
    if t.is_finite() && (0.0..=1.0).contains(&t) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "color_tolerance must be between 0.0 and 1.0, got {t}"
        )))
    }
}

/// Resolve an optional tolerance override against the default.
///
/// An invalid override is rejected in favour of
/// [`DEFAULT_COLOR_TOLERANCE`]; the caller receives the error alongside
/// the fallback so it can be logged.
pub fn resolve_tolerance(tolerance: Option<f64>) -> (f64, Option<CoreError>) {
    match tolerance {
        None => (DEFAULT_COLOR_TOLERANCE, None),
        Some(t) => match validate_color_tolerance(t) {
            Ok(()) => (t, None),
            Err(e) => (DEFAULT_COLOR_TOLERANCE, Some(e)),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
