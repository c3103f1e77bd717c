//! Shared fixtures for continuity integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use image::{Rgb, RgbImage};
use storyframe_core::generation::{GenerationOutcome, ImageGenerator};
use storyframe_core::payload::GenerationPayload;
use storyframe_core::plan::{default_continuity_map, ProjectMode, ProjectPlan, ShotSpec};

pub const GRAY: [u8; 3] = [128, 128, 128];
pub const WHITE: [u8; 3] = [255, 255, 255];

/// Write a solid-color 64x64 PNG and return its path.
pub fn write_solid_png(dir: &Path, name: &str, rgb: [u8; 3]) -> PathBuf {
    let path = dir.join(name);
    RgbImage::from_pixel(64, 64, Rgb(rgb))
        .save(&path)
        .expect("write fixture png");
    path
}

pub fn plan_with_shots(shots: &[(&str, &str)]) -> ProjectPlan {
    ProjectPlan {
        project_id: "proj_test".to_string(),
        mode: ProjectMode::Storyboard,
        brief: "A night chase through the city".to_string(),
        continuity_map: default_continuity_map("cm_test"),
        shots: shots
            .iter()
            .map(|(id, description)| ShotSpec::new(*id, "medium", *description))
            .collect(),
    }
}

/// What the fake generator does for a given shot.
#[derive(Debug, Clone)]
pub enum Script {
    /// Write a solid image of this color and report success.
    Solid([u8; 3]),
    /// Report a failure without writing anything.
    Fail(String),
    /// Report the offline placeholder outcome.
    Offline,
}

/// A recorded generator invocation.
#[derive(Debug, Clone)]
pub struct Call {
    pub project_id: String,
    pub shot_id: String,
    pub prompt: String,
    pub description: String,
}

/// Scripted stand-in for the HTTP client.
pub struct FakeGenerator {
    dir: PathBuf,
    scripts: HashMap<String, Script>,
    default: Script,
    calls: Mutex<Vec<Call>>,
}

impl FakeGenerator {
    pub fn new(dir: &Path, default: Script) -> Self {
        Self {
            dir: dir.to_path_buf(),
            scripts: HashMap::new(),
            default,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(mut self, shot_id: &str, script: Script) -> Self {
        self.scripts.insert(shot_id.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }

    pub fn calls_for(&self, shot_id: &str) -> usize {
        self.calls().iter().filter(|c| c.shot_id == shot_id).count()
    }
}

impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        payload: &GenerationPayload,
        project_id: &str,
        shot_id: &str,
    ) -> GenerationOutcome {
        self.calls.lock().expect("calls lock").push(Call {
            project_id: project_id.to_string(),
            shot_id: shot_id.to_string(),
            prompt: payload.prompt.clone(),
            description: payload.structured_params.description.clone(),
        });

        let script = self
            .scripts
            .get(shot_id)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        match script {
            Script::Solid(rgb) => GenerationOutcome::Success {
                image_path: write_solid_png(&self.dir, &format!("regen_{shot_id}.png"), rgb),
            },
            Script::Fail(reason) => GenerationOutcome::Failed {
                image_path: None,
                reason,
            },
            Script::Offline => GenerationOutcome::Offline {
                image_path: self.dir.join(format!("offline_{shot_id}.png")),
            },
        }
    }
}
