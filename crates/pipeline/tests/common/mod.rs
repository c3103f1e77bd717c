//! Shared fixtures for pipeline integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{Rgb, RgbImage};
use storyframe_core::generation::{GenerationOutcome, ImageGenerator};
use storyframe_core::payload::GenerationPayload;
use storyframe_core::plan::{default_continuity_map, ProjectMode, ProjectPlan, ShotSpec};
use tokio_util::sync::CancellationToken;

pub const GRAY: [u8; 3] = [128, 128, 128];
pub const WHITE: [u8; 3] = [255, 255, 255];

pub fn plan_with_shots(ids: &[&str]) -> ProjectPlan {
    ProjectPlan {
        project_id: "proj_pipe".to_string(),
        mode: ProjectMode::Storyboard,
        brief: "A courier crosses a rain-soaked city".to_string(),
        continuity_map: default_continuity_map("cm_pipe"),
        shots: ids
            .iter()
            .map(|id| ShotSpec::new(*id, "medium", format!("Scene for {id}")))
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Solid([u8; 3]),
    Fail(String),
}

/// Scripted generator. Each render id consumes its queued steps in order,
/// then falls back to the default step.
pub struct FakeGenerator {
    dir: PathBuf,
    default: Step,
    queues: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<(String, String)>>,
    payloads: Mutex<Vec<GenerationPayload>>,
    cancel_after: Option<(usize, CancellationToken)>,
}

impl FakeGenerator {
    pub fn new(dir: &Path, default: Step) -> Self {
        Self {
            dir: dir.to_path_buf(),
            default,
            queues: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            payloads: Mutex::new(Vec::new()),
            cancel_after: None,
        }
    }

    pub fn steps(self, render_id: &str, steps: Vec<Step>) -> Self {
        self.queues
            .lock()
            .expect("queues lock")
            .insert(render_id.to_string(), steps.into());
        self
    }

    /// Cancel `token` once `calls` generations have completed.
    pub fn cancel_after(mut self, calls: usize, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    /// `(render_id, description)` of every call, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Every payload received, in call order.
    pub fn payloads(&self) -> Vec<GenerationPayload> {
        self.payloads.lock().expect("payloads lock").clone()
    }
}

impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        payload: &GenerationPayload,
        project_id: &str,
        shot_id: &str,
    ) -> GenerationOutcome {
        let call_count = {
            let mut calls = self.calls.lock().expect("calls lock");
            calls.push((
                shot_id.to_string(),
                payload.structured_params.description.clone(),
            ));
            calls.len()
        };
        self.payloads
            .lock()
            .expect("payloads lock")
            .push(payload.clone());
        if let Some((after, token)) = &self.cancel_after {
            if call_count >= *after {
                token.cancel();
            }
        }

        let step = self
            .queues
            .lock()
            .expect("queues lock")
            .get_mut(shot_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| self.default.clone());

        match step {
            Step::Solid(rgb) => {
                let dir = self.dir.join(project_id);
                std::fs::create_dir_all(&dir).expect("create project dir");
                let path = dir.join(format!("shot_{shot_id}.png"));
                RgbImage::from_pixel(32, 32, Rgb(rgb))
                    .save(&path)
                    .expect("write png");
                GenerationOutcome::Success { image_path: path }
            }
            Step::Fail(reason) => GenerationOutcome::Failed {
                image_path: None,
                reason,
            },
        }
    }
}
