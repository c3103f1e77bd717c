//! Worker configuration loaded from environment variables.

use std::path::PathBuf;

use storyframe_core::continuity::validate_color_tolerance;
use storyframe_core::plan::ProjectMode;
use storyframe_core::planner::{DEFAULT_SHOT_COUNT, SHOT_COUNT_RANGE};
use storyframe_fibo::FiboConfig;

use crate::error::{WorkerError, WorkerResult};

/// Worker run configuration.
///
/// | Env Var            | Required | Default                                |
/// |--------------------|----------|----------------------------------------|
/// | `PLAN_PATH`        | one of   | --                                     |
/// | `BRIEF`            | one of   | --                                     |
/// | `MODE`             | no       | `storyboard`                           |
/// | `NUM_SHOTS`        | no       | `5`                                    |
/// | `PROJECT_NAME`     | no       | project id                             |
/// | `RESULTS_PATH`     | no       | `<OUTPUT_DIR>/<project_id>/results.json` |
/// | `COLOR_TOLERANCE`  | no       | `0.15`                                 |
/// | `AUTO_FIX`         | no       | `true`                                 |
/// | `REFERENCE_IMAGE`  | no       | --                                     |
///
/// `PLAN_PATH` wins when both it and `BRIEF` are set; `MODE` and
/// `NUM_SHOTS` only apply to a brief. FIBO client variables are
/// documented on [`FiboConfig`].
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub plan: PlanSource,
    /// Name recorded in the saved project state.
    pub project_name: Option<String>,
    /// Explicit results location; see [`WorkerConfig::results_path`].
    pub results_path: Option<PathBuf>,
    /// Validated continuity tolerance override.
    pub tolerance: Option<f64>,
    pub auto_fix: bool,
    pub reference_image: Option<PathBuf>,
    pub fibo: FiboConfig,
}

/// Where the project plan comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanSource {
    /// A plan JSON file.
    File(PathBuf),
    /// Plan from a brief with the template planner.
    Brief {
        brief: String,
        mode: ProjectMode,
        num_shots: usize,
    },
}

impl WorkerConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> WorkerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> WorkerResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let plan = match (get("PLAN_PATH"), get("BRIEF")) {
            (Some(path), _) => PlanSource::File(PathBuf::from(path)),
            (None, Some(brief)) => PlanSource::Brief {
                brief,
                mode: get("MODE")
                    .map(|raw| parse_mode(&raw))
                    .transpose()?
                    .unwrap_or(ProjectMode::Storyboard),
                num_shots: get("NUM_SHOTS")
                    .map(|raw| parse_num_shots(&raw))
                    .transpose()?
                    .unwrap_or(DEFAULT_SHOT_COUNT),
            },
            (None, None) => {
                return Err(WorkerError::Config(
                    "PLAN_PATH or BRIEF environment variable is required".into(),
                ))
            }
        };

        let tolerance = get("COLOR_TOLERANCE")
            .map(|raw| parse_tolerance(&raw))
            .transpose()?;

        let auto_fix = match get("AUTO_FIX") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                WorkerError::Config(format!("AUTO_FIX must be a boolean, got '{raw}'"))
            })?,
            None => true,
        };

        Ok(Self {
            plan,
            project_name: get("PROJECT_NAME"),
            results_path: get("RESULTS_PATH").map(PathBuf::from),
            tolerance,
            auto_fix,
            reference_image: get("REFERENCE_IMAGE").map(PathBuf::from),
            fibo: FiboConfig::from_lookup(&lookup),
        })
    }

    /// Where results for `project_id` are written.
    pub fn results_path(&self, project_id: &str) -> PathBuf {
        self.results_path.clone().unwrap_or_else(|| {
            self.fibo
                .output_dir
                .join(project_id)
                .join("results.json")
        })
    }
}

fn parse_tolerance(raw: &str) -> WorkerResult<f64> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        WorkerError::Config(format!("COLOR_TOLERANCE must be a number, got '{raw}'"))
    })?;
    validate_color_tolerance(value)?;
    Ok(value)
}

fn parse_mode(raw: &str) -> WorkerResult<ProjectMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "storyboard" => Ok(ProjectMode::Storyboard),
        "product" => Ok(ProjectMode::Product),
        _ => Err(WorkerError::Config(format!(
            "MODE must be 'storyboard' or 'product', got '{raw}'"
        ))),
    }
}

fn parse_num_shots(raw: &str) -> WorkerResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(n) if SHOT_COUNT_RANGE.contains(&n) => Ok(n),
        _ => Err(WorkerError::Config(format!(
            "NUM_SHOTS must be a whole number between {} and {}, got '{raw}'",
            SHOT_COUNT_RANGE.start(),
            SHOT_COUNT_RANGE.end()
        ))),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
