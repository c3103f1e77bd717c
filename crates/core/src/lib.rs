//! Domain types and pure helpers shared by every storyframe crate.
//!
//! Holds the project plan model and its template planner, the generation
//! payload builder, the continuity thresholds, and the
//! [`generation::ImageGenerator`] seam that image-generation backends
//! implement.

pub mod continuity;
pub mod error;
pub mod generation;
pub mod payload;
pub mod plan;
pub mod planner;
pub mod shot_output;
