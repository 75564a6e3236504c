pub mod commands;
pub mod custom_properties;
pub mod item_groups;
pub mod overlay;
pub mod scene_facade;
pub mod stage_export;

use std::path::PathBuf;

use bevy::prelude::*;
use stagehand_export::SceneTiming;
use stagehand_stage::StageTypesPlugin;

pub use stagehand_export;

/// Marks entities that belong to the editor itself and never to the stage.
#[derive(Component, Default)]
pub struct EditorEntity;

/// Animation timeline of the authoring scene.
#[derive(Resource, Clone, Copy, Debug, Default, Deref, DerefMut)]
pub struct StageTiming(pub SceneTiming);

#[derive(Default)]
pub struct StagehandPlugin {
    /// JSON file with `StageExportSettings`; defaults are used when unset.
    pub settings_file: Option<PathBuf>,
}

impl Plugin for StagehandPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            StageTypesPlugin,
            commands::CommandHistoryPlugin,
            item_groups::ItemGroupPlugin,
            overlay::OverlayPlugin,
            stage_export::StageExportPlugin {
                settings_file: self.settings_file.clone(),
            },
        ))
        .init_resource::<StageTiming>()
        .register_type::<scene_facade::StageTag>();
    }
}
