//! Continuity scoring of one color summary against a reference.
//!
//! The similarity score is `max(0, 1 - distance)`. Since each HSV
//! component lies in `[0, 1]`, distances range up to
//! [`MAX_HSV_DISTANCE`] (√3), so the score bottoms out at 0 well before
//! the distance does. This scaling is kept as-is; the pass/fail verdict
//! uses the raw distance and is unaffected by it.

use crate::color::ColorSummary;

/// Largest possible distance between two summaries (unit cube diagonal).
pub const MAX_HSV_DISTANCE: f64 = 1.732_050_807_568_877_2;

/// Outcome of comparing a candidate against the reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContinuityScore {
    /// Raw Euclidean distance, `>= 0`.
    pub distance: f64,
    /// Similarity in `[0, 1]`; 1 means identical.
    pub score: f64,
    /// `distance <= tolerance` (inclusive).
    pub ok: bool,
}

/// Map a distance to a bounded similarity score.
pub fn similarity(distance: f64) -> f64 {
    (1.0 - distance).max(0.0)
}

/// Compare `candidate` against `reference` under `tolerance`.
pub fn score(reference: &ColorSummary, candidate: &ColorSummary, tolerance: f64) -> ContinuityScore {
    let distance = reference.distance(candidate);
    ContinuityScore {
        distance,
        score: similarity(distance),
        ok: distance <= tolerance,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- similarity -----------------------------------------------------------

    #[test]
    fn similarity_clamps_at_zero() {
        assert_eq!(similarity(0.0), 1.0);
        assert_eq!(similarity(0.25), 0.75);
        assert_eq!(similarity(1.0), 0.0);
        assert_eq!(similarity(MAX_HSV_DISTANCE), 0.0);
    }

    // -- score ----------------------------------------------------------------

    #[test]
    fn identical_summaries_score_perfectly() {
        let c = ColorSummary::new(0.3, 0.4, 0.5);
        let s = score(&c, &c, 0.15);
        assert_eq!(s.distance, 0.0);
        assert_eq!(s.score, 1.0);
        assert!(s.ok);
    }

    #[test]
    fn tolerance_boundary_is_inclusive() {
        let reference = ColorSummary::new(0.0, 0.0, 0.5);
        let candidate = ColorSummary::new(0.0, 0.0, 0.75);
        // 0.25 is exactly representable, so the distance is exactly 0.25.
        let s = score(&reference, &candidate, 0.25);
        assert_eq!(s.distance, 0.25);
        assert!(s.ok);
        assert!(!score(&reference, &candidate, 0.2).ok);
    }

    #[test]
    fn score_is_symmetric() {
        let a = ColorSummary::new(0.9, 0.1, 0.4);
        let b = ColorSummary::new(0.2, 0.6, 0.8);
        assert_eq!(score(&a, &b, 0.15), score(&b, &a, 0.15));
    }

    #[test]
    fn extremes_stay_bounded() {
        let black = ColorSummary::new(0.0, 0.0, 0.0);
        let corner = ColorSummary::new(1.0, 1.0, 1.0);
        let s = score(&black, &corner, 0.15);
        assert!(s.distance <= MAX_HSV_DISTANCE + 1e-12);
        assert_eq!(s.score, 0.0);
        assert!(!s.ok);
    }

    #[test]
    fn max_distance_constant_matches_sqrt3() {
        assert!((MAX_HSV_DISTANCE - 3f64.sqrt()).abs() < 1e-15);
    }
}
