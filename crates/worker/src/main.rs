//! `storyframe-worker` -- batch storyboard generator.
//!
//! Loads a project plan (or plans one from a brief), renders every shot
//! through the FIBO API, checks color continuity against the first shot,
//! regenerates outliers once, and writes the annotated results and the
//! project state as JSON. Ctrl-C stops the run between
//! shots; partial results are still written.
//!
//! # Environment variables
//!
//! | Variable                    | Required | Default       | Description                         |
//! |-----------------------------|----------|---------------|-------------------------------------|
//! | `PLAN_PATH`                 | one of   | --            | Project plan JSON file              |
//! | `BRIEF`                     | one of   | --            | Brief to plan from when no file     |
//! | `MODE`                      | no       | `storyboard`  | `storyboard` or `product`           |
//! | `NUM_SHOTS`                 | no       | `5`           | Shots planned from a brief (3-8)    |
//! | `PROJECT_NAME`              | no       | project id    | Name stored in the project state    |
//! | `RESULTS_PATH`              | no       | `<OUTPUT_DIR>/<project_id>/results.json` | Results file |
//! | `COLOR_TOLERANCE`           | no       | `0.15`        | Max HSV distance from the reference |
//! | `AUTO_FIX`                  | no       | `true`        | Regenerate failing shots once       |
//! | `REFERENCE_IMAGE`           | no       | --            | Pre-existing reference image        |
//! | `FIBO_API_URL`              | no       | Bria v2 generate endpoint | Generation endpoint     |
//! | `FIBO_API_KEY`              | no       | --            | Absent means placeholder images     |
//! | `OUTPUT_DIR`                | no       | `outputs`     | Artifact root directory             |
//! | `FIBO_REQUEST_TIMEOUT_SECS` | no       | `60`          | Per-request HTTP timeout            |
//! | `FIBO_POLL_MAX_ATTEMPTS`    | no       | `30`          | Status polls before giving up       |
//! | `FIBO_POLL_DELAY_MS`        | no       | `1000`        | Delay between status polls          |

use storyframe_worker::WorkerConfig;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storyframe_worker=info,storyframe_continuity=info,storyframe_fibo=info,storyframe_pipeline=info"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WorkerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        plan = ?config.plan,
        offline = !config.fibo.is_online(),
        "Starting storyframe-worker",
    );

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current shot");
            ctrl_c.cancel();
        }
    });

    match storyframe_worker::run(config, cancel).await {
        Ok(report) => {
            tracing::info!(
                total = report.summary.total,
                passed = report.summary.passed,
                failed = report.summary.failed,
                unscored = report.summary.unscored,
                re_rendered = report.summary.re_rendered,
                cancelled = report.cancelled,
                "Continuity summary",
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "Worker run failed");
            std::process::exit(1);
        }
    }
}
