//! Visual continuity checks for generated shot sequences.
//!
//! Measures averaged HSV color drift of every shot against the first
//! (reference) shot, flags outliers, and regenerates them once with a
//! reinforced prompt. [`style`] extracts a palette from a reference image
//! so a run can be steered toward it.
//!
//! Every failure in this crate is soft: an unreadable image, a missing
//! reference, a vanished shot spec, or a failed regeneration degrades
//! the annotation of one shot and is logged, never propagated.

pub mod autofix;
pub mod color;
pub mod scorer;
pub mod style;
pub mod summary;
pub mod validator;

pub use autofix::{auto_fix_continuity, AutoFixReport};
pub use color::{analyze_image, analyze_image_offloaded, ColorSummary};
pub use scorer::{score, ContinuityScore};
pub use style::{apply_style, extract_style, extract_style_offloaded, StyleDna, StyleParams};
pub use summary::{summarize, ContinuitySummary};
pub use validator::{validate_continuity, validate_continuity_offloaded};
