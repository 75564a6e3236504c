use bevy::prelude::*;

/// Default number of commands kept on the undo stack.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

// ---------------------------------------------------------------------------
// EditorCommand trait
// ---------------------------------------------------------------------------

/// A reversible edit of the authoring scene.
pub trait EditorCommand: Send + Sync + 'static {
    fn execute(&self, world: &mut World);
    fn undo(&self, world: &mut World);
    fn description(&self) -> &str;
}

// ---------------------------------------------------------------------------
// CommandHistory resource
// ---------------------------------------------------------------------------

#[derive(Resource)]
pub struct CommandHistory {
    pub undo_stack: Vec<Box<dyn EditorCommand>>,
    pub redo_stack: Vec<Box<dyn EditorCommand>>,
    /// Oldest commands are dropped once the undo stack grows past this.
    pub limit: usize,
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl CommandHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record a command that has already been applied.
    pub fn push_executed(&mut self, command: Box<dyn EditorCommand>) {
        self.push_undo(command);
        self.redo_stack.clear();
    }

    /// Push onto the undo stack, dropping the oldest entries past `limit`.
    fn push_undo(&mut self, command: Box<dyn EditorCommand>) {
        self.undo_stack.push(command);
        let limit = self.limit.max(1);
        if self.undo_stack.len() > limit {
            let overflow = self.undo_stack.len() - limit;
            self.undo_stack.drain(..overflow);
        }
    }
}

// ---------------------------------------------------------------------------
// World helpers
// ---------------------------------------------------------------------------

// The command is taken off the stack before it runs so it can borrow the
// world mutably, then pushed onto the opposite stack.

/// Apply `command` and record it for undo.
pub fn execute_command(world: &mut World, command: Box<dyn EditorCommand>) {
    command.execute(world);
    debug!("executed: {}", command.description());
    world
        .get_resource_or_init::<CommandHistory>()
        .push_executed(command);
}

/// Revert the most recent command. Returns `false` if there was nothing to undo.
pub fn undo(world: &mut World) -> bool {
    let Some(command) = world
        .get_resource_mut::<CommandHistory>()
        .and_then(|mut history| history.undo_stack.pop())
    else {
        return false;
    };
    command.undo(world);
    debug!("undid: {}", command.description());
    world.resource_mut::<CommandHistory>().redo_stack.push(command);
    true
}

/// Re-apply the most recently undone command.
pub fn redo(world: &mut World) -> bool {
    let Some(command) = world
        .get_resource_mut::<CommandHistory>()
        .and_then(|mut history| history.redo_stack.pop())
    else {
        return false;
    };
    command.execute(world);
    debug!("redid: {}", command.description());
    world.resource_mut::<CommandHistory>().push_undo(command);
    true
}

// ---------------------------------------------------------------------------
// CommandGroup
// ---------------------------------------------------------------------------

/// Several commands undone and redone as one step.
pub struct CommandGroup {
    pub commands: Vec<Box<dyn EditorCommand>>,
    pub label: String,
}

impl EditorCommand for CommandGroup {
    fn execute(&self, world: &mut World) {
        for cmd in &self.commands {
            cmd.execute(world);
        }
    }

    fn undo(&self, world: &mut World) {
        for cmd in self.commands.iter().rev() {
            cmd.undo(world);
        }
    }

    fn description(&self) -> &str {
        &self.label
    }
}
