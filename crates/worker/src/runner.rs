//! One complete worker run: plan in, results file and project state out.

use storyframe_core::plan::ProjectPlan;
use storyframe_core::planner::{project_id_from_brief, template_plan};
use storyframe_fibo::FiboClient;
use storyframe_pipeline::{run_storyboard, RunOptions, RunReport};
use tokio_util::sync::CancellationToken;

use crate::config::{PlanSource, WorkerConfig};
use crate::error::{WorkerError, WorkerResult};
use crate::project::save_project;
use crate::results::{load_plan, write_results};

/// Load or plan the project, generate and validate the storyboard, and
/// persist the report and the project state.
///
/// Only configuration, plan, and persistence errors are returned; shot
/// failures are recorded in the report.
pub async fn run(config: WorkerConfig, cancel: CancellationToken) -> WorkerResult<RunReport> {
    let plan = resolve_plan(&config.plan).await?;
    let results_path = config.results_path(&plan.project_id);
    let project_name = config
        .project_name
        .clone()
        .unwrap_or_else(|| plan.project_id.clone());

    let project_dir = config.fibo.output_dir.join(&plan.project_id);
    tokio::fs::create_dir_all(&project_dir)
        .await
        .map_err(|source| WorkerError::Io {
            path: project_dir.display().to_string(),
            source,
        })?;

    tracing::info!(
        project_id = %plan.project_id,
        shots = plan.shots.len(),
        auto_fix = config.auto_fix,
        tolerance = ?config.tolerance,
        "Loaded project plan",
    );

    let options = RunOptions {
        tolerance: config.tolerance,
        auto_fix: config.auto_fix,
        reference_image: config.reference_image.clone(),
    };
    let client = FiboClient::new(config.fibo);
    let progress = |index: usize, total: usize, shot_id: &str| {
        tracing::info!(shot_id, "Generating shot {}/{}", index + 1, total);
    };

    let report = run_storyboard(&plan, &client, &options, Some(&progress), &cancel).await;

    write_results(&results_path, &report).await?;
    tracing::info!(path = %results_path.display(), "Wrote results");

    save_project(&project_dir, &project_name, &plan, &report.outputs).await?;

    Ok(report)
}

async fn resolve_plan(source: &PlanSource) -> WorkerResult<ProjectPlan> {
    match source {
        PlanSource::File(path) => load_plan(path).await,
        PlanSource::Brief {
            brief,
            mode,
            num_shots,
        } => {
            let plan = template_plan(project_id_from_brief(brief), brief, *mode, *num_shots)?;
            tracing::info!(project_id = %plan.project_id, ?mode, "Planned project from brief");
            Ok(plan)
        }
    }
}
