//! Aggregate continuity counts for a validated sequence.

use serde::Serialize;
use storyframe_core::shot_output::ShotOutput;

/// Counts of shots by continuity verdict.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContinuitySummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Shots without a verdict (sequence not validated).
    pub unscored: usize,
    pub re_rendered: usize,
}

/// Compute a summary from a slice of outputs.
pub fn summarize(outputs: &[ShotOutput]) -> ContinuitySummary {
    let mut summary = ContinuitySummary {
        total: outputs.len(),
        ..Default::default()
    };

    for output in outputs {
        match output.continuity_ok {
            Some(true) => summary.passed += 1,
            Some(false) => summary.failed += 1,
            None => summary.unscored += 1,
        }
        if output.re_rendered {
            summary.re_rendered += 1;
        }
    }

    summary
}
