use bevy::prelude::*;

pub use stagehand_commands::{
    CommandGroup, CommandHistory, EditorCommand, execute_command, redo, undo,
};

pub struct CommandHistoryPlugin;

impl Plugin for CommandHistoryPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CommandHistory>()
            .add_systems(Update, handle_undo_redo_keys);
    }
}

// ---------------------------------------------------------------------------
// Keyboard shortcut system
// ---------------------------------------------------------------------------

fn handle_undo_redo_keys(world: &mut World) {
    let Some(keyboard) = world.get_resource::<ButtonInput<KeyCode>>() else {
        return;
    };
    let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    let shift = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    let z_pressed = keyboard.just_pressed(KeyCode::KeyZ);
    let y_pressed = keyboard.just_pressed(KeyCode::KeyY);

    if !ctrl {
        return;
    }
    if (z_pressed && shift) || y_pressed {
        redo(world);
    } else if z_pressed {
        undo(world);
    }
}
