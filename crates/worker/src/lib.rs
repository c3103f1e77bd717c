//! `storyframe-worker` library crate.
//!
//! Holds configuration, plan/results and project-state persistence, and
//! the run entry point so they can be exercised by integration tests. The binary lives
//! in `main.rs`.

pub mod config;
pub mod error;
pub mod project;
pub mod results;
pub mod runner;

pub use config::{PlanSource, WorkerConfig};
pub use error::WorkerError;
pub use project::{list_saved_projects, load_project, save_project, ProjectState, SavedProject};
pub use runner::run;
