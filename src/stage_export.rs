use std::path::{Path, PathBuf};

use anyhow::Context;
use bevy::{prelude::*, tasks::IoTaskPool};
use serde::{Deserialize, Serialize};
use stagehand_export::{ExportReport, ExportSettings, export_scene};

use crate::scene_facade::WorldScene;

#[derive(Default)]
pub struct StageExportPlugin {
    pub settings_file: Option<PathBuf>,
}

impl Plugin for StageExportPlugin {
    fn build(&self, app: &mut App) {
        let settings = match &self.settings_file {
            Some(path) => StageExportSettings::load(path).unwrap_or_else(|err| {
                warn!("{err:#}; using default export settings");
                StageExportSettings::default()
            }),
            None => StageExportSettings::default(),
        };
        app.insert_resource(settings)
            .init_resource::<LastExport>()
            .add_systems(Update, handle_export_keys);
    }
}

/// Where the stage is written and how it is exported.
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct StageExportSettings {
    pub path: PathBuf,
    #[serde(flatten)]
    pub settings: ExportSettings,
}

impl Default for StageExportSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("stage.json"),
            settings: ExportSettings::default(),
        }
    }
}

impl StageExportSettings {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading export settings {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("parsing export settings {}", path.display()))
    }
}

/// Violations collected by the most recent export, for panels to display.
#[derive(Resource, Default)]
pub struct LastExport {
    pub report: Option<ExportReport>,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Build the stage document from the current world.
pub fn export_world(world: &mut World) -> ExportReport {
    let scene = WorldScene::capture(world);
    let settings = world
        .get_resource::<StageExportSettings>()
        .map(|s| s.settings.clone())
        .unwrap_or_default();
    export_scene(&scene, &settings)
}

/// Export the world and write the document to the configured path on the IO
/// task pool. Objects that failed validation are logged and left out.
pub fn export_stage_to_file(world: &mut World) {
    let report = export_world(world);
    for violation in &report.errors {
        warn!("Stage export skipped {violation}");
    }

    let export_settings = world
        .get_resource::<StageExportSettings>()
        .cloned()
        .unwrap_or_default();
    let json = match report.document.to_json(export_settings.settings.pretty) {
        Ok(json) => json,
        Err(err) => {
            warn!("Failed to serialize stage: {err}");
            return;
        }
    };
    world.insert_resource(LastExport {
        report: Some(report),
    });

    let path = export_settings.path;
    IoTaskPool::get()
        .spawn(async move {
            match write_document(&path, &json) {
                Ok(()) => info!("Stage exported to {}", path.display()),
                Err(err) => warn!("Failed to write stage file: {err:#}"),
            }
        })
        .detach();
}

pub fn write_document(path: &Path, json: &str) -> anyhow::Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating {}", dir.display()))?;
    }
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}

// ---------------------------------------------------------------------------
// Keyboard shortcut system
// ---------------------------------------------------------------------------

fn handle_export_keys(world: &mut World) {
    let Some(keyboard) = world.get_resource::<ButtonInput<KeyCode>>() else {
        return;
    };
    let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    if ctrl && keyboard.just_pressed(KeyCode::KeyE) {
        export_stage_to_file(world);
    }
}
