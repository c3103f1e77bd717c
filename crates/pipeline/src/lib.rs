//! Storyboard orchestration on top of an [`ImageGenerator`].
//!
//! [`sequence`] generates and refines shots; [`run`] chains generation,
//! continuity validation, and auto-fix into a single storyboard run.
//!
//! [`ImageGenerator`]: storyframe_core::generation::ImageGenerator

pub mod run;
pub mod sequence;

pub use run::{run_storyboard, RunOptions, RunReport};
pub use sequence::{generate_sequence, refine_shot, ProgressFn};
