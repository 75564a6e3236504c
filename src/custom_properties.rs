use bevy::prelude::*;

use crate::commands::EditorCommand;

pub use stagehand_stage::{CustomProperties, PropertyValue};

// ---------------------------------------------------------------------------
// SetCustomProperties
// ---------------------------------------------------------------------------

/// Undo command that swaps the whole `CustomProperties` component.
///
/// `old_properties` of `None` means the entity had no component before, so
/// undo removes it again.
pub struct SetCustomProperties {
    pub entity: Entity,
    pub old_properties: Option<CustomProperties>,
    pub new_properties: CustomProperties,
}

impl SetCustomProperties {
    /// Capture the entity's current properties and replace them with `new`.
    pub fn capture(world: &World, entity: Entity, new_properties: CustomProperties) -> Self {
        Self {
            entity,
            old_properties: world.get::<CustomProperties>(entity).cloned(),
            new_properties,
        }
    }
}

impl EditorCommand for SetCustomProperties {
    fn execute(&self, world: &mut World) {
        if let Ok(mut entity) = world.get_entity_mut(self.entity) {
            entity.insert(self.new_properties.clone());
        }
    }

    fn undo(&self, world: &mut World) {
        let Ok(mut entity) = world.get_entity_mut(self.entity) else {
            return;
        };
        match &self.old_properties {
            Some(old) => {
                entity.insert(old.clone());
            }
            None => {
                entity.remove::<CustomProperties>();
            }
        }
    }

    fn description(&self) -> &str {
        "Set custom properties"
    }
}

/// Set a single property as an undoable step.
pub fn set_property(world: &mut World, entity: Entity, key: &str, value: PropertyValue) {
    let mut properties = world
        .get::<CustomProperties>(entity)
        .cloned()
        .unwrap_or_default();
    properties.insert(key, value);
    let command = SetCustomProperties::capture(world, entity, properties);
    crate::commands::execute_command(world, Box::new(command));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandHistory, undo};

    #[test]
    fn undo_restores_missing_component() {
        let mut world = World::new();
        world.init_resource::<CommandHistory>();
        let entity = world.spawn_empty().id();

        set_property(&mut world, entity, "linkedId", PropertyValue::Int(4));
        assert_eq!(
            world
                .get::<CustomProperties>(entity)
                .and_then(|p| p.get("linkedId")),
            Some(&PropertyValue::Int(4))
        );

        undo(&mut world);
        assert!(world.get::<CustomProperties>(entity).is_none());
    }

    #[test]
    fn undo_restores_previous_values() {
        let mut world = World::new();
        world.init_resource::<CommandHistory>();
        let before = CustomProperties::default().with("goalType", PropertyValue::Int(0));
        let entity = world.spawn(before.clone()).id();

        set_property(&mut world, entity, "goalType", PropertyValue::Int(2));
        undo(&mut world);
        assert_eq!(world.get::<CustomProperties>(entity), Some(&before));
    }
}
