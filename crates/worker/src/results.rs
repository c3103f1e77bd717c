//! Plan loading and results persistence.

use std::path::Path;

use storyframe_core::plan::ProjectPlan;
use storyframe_pipeline::RunReport;

use crate::error::{WorkerError, WorkerResult};

/// Read, parse, and validate a project plan JSON file.
pub async fn load_plan(path: &Path) -> WorkerResult<ProjectPlan> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| WorkerError::Io {
            path: path.display().to_string(),
            source,
        })?;

    let plan: ProjectPlan = serde_json::from_str(&raw).map_err(|source| WorkerError::Json {
        path: path.display().to_string(),
        source,
    })?;
    plan.validate()?;

    Ok(plan)
}

/// Write `report` as pretty-printed JSON, creating parent directories.
pub async fn write_results(path: &Path, report: &RunReport) -> WorkerResult<()> {
    let io_err = |source| WorkerError::Io {
        path: path.display().to_string(),
        source,
    };

    let json = serde_json::to_string_pretty(report).map_err(|source| WorkerError::Json {
        path: path.display().to_string(),
        source,
    })?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, json).await.map_err(io_err)?;

    Ok(())
}
