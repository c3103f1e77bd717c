//! Saved project state: the plan and its annotated outputs, kept next to
//! the rendered shots so a run can be reopened later.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storyframe_core::plan::ProjectPlan;
use storyframe_core::shot_output::ShotOutput;

use crate::error::{WorkerError, WorkerResult};

/// File name of the saved state inside a project directory.
pub const PROJECT_STATE_FILE: &str = "project_state.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub project_name: String,
    pub plan: ProjectPlan,
    pub outputs: Vec<ShotOutput>,
    pub saved_at: DateTime<Utc>,
}

/// Listing entry for a project directory holding a saved state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavedProject {
    /// Name of the project directory.
    pub project_id: String,
    pub project_name: String,
    pub path: PathBuf,
}

fn io_error(path: &Path, source: std::io::Error) -> WorkerError {
    WorkerError::Io {
        path: path.display().to_string(),
        source,
    }
}

/// Write `project_dir/project_state.json`, creating the directory.
///
/// Returns the path written.
pub async fn save_project(
    project_dir: &Path,
    project_name: &str,
    plan: &ProjectPlan,
    outputs: &[ShotOutput],
) -> WorkerResult<PathBuf> {
    let path = project_dir.join(PROJECT_STATE_FILE);
    let state = ProjectState {
        project_name: project_name.to_string(),
        plan: plan.clone(),
        outputs: outputs.to_vec(),
        saved_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&state).map_err(|source| WorkerError::Json {
        path: path.display().to_string(),
        source,
    })?;

    tokio::fs::create_dir_all(project_dir)
        .await
        .map_err(|e| io_error(project_dir, e))?;
    tokio::fs::write(&path, json)
        .await
        .map_err(|e| io_error(&path, e))?;

    tracing::info!(path = %path.display(), project_name, "Saved project state");
    Ok(path)
}

/// Read the saved state of `project_dir`. `Ok(None)` when nothing was
/// saved there.
pub async fn load_project(project_dir: &Path) -> WorkerResult<Option<ProjectState>> {
    let path = project_dir.join(PROJECT_STATE_FILE);
    let raw = match tokio::fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_error(&path, e)),
    };
    let state = serde_json::from_str(&raw).map_err(|source| WorkerError::Json {
        path: path.display().to_string(),
        source,
    })?;
    Ok(Some(state))
}

/// List every subdirectory of `base_dir` that holds a readable saved
/// state, ordered by directory name.
///
/// A missing `base_dir` lists nothing. Unreadable or corrupt state files
/// are logged and skipped.
pub async fn list_saved_projects(base_dir: &Path) -> WorkerResult<Vec<SavedProject>> {
    let mut entries = match tokio::fs::read_dir(base_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(base_dir, e)),
    };

    let mut projects = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| io_error(base_dir, e))?
    {
        let path = entry.path();
        if !path.is_dir() || !path.join(PROJECT_STATE_FILE).exists() {
            continue;
        }
        match load_project(&path).await {
            Ok(Some(state)) => projects.push(SavedProject {
                project_id: entry.file_name().to_string_lossy().into_owned(),
                project_name: state.project_name,
                path,
            }),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable project state");
            }
        }
    }

    projects.sort_by(|a, b| a.project_id.cmp(&b.project_id));
    Ok(projects)
}
