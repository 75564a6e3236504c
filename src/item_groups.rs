use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::bail;
use bevy::prelude::*;
use stagehand_export::{AnimationId, AnimationIdAllocator, construct_item_group};
use stagehand_stage::{CustomProperties, PropertyValue};

use crate::commands::{EditorCommand, execute_command};
use crate::custom_properties::SetCustomProperties;

pub struct ItemGroupPlugin;

impl Plugin for ItemGroupPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AnimationIds>()
            .add_systems(PreUpdate, register_loaded_anim_ids);
    }
}

/// Session registry of animation ids handed to item groups.
#[derive(Resource, Default, Deref, DerefMut)]
pub struct AnimationIds(pub AnimationIdAllocator);

// ---------------------------------------------------------------------------
// ConvertToItemGroup
// ---------------------------------------------------------------------------

/// Turns an entity into an item group. Undo restores the previous properties
/// and releases the animation id; redo takes it back.
pub struct ConvertToItemGroup {
    pub properties: SetCustomProperties,
    pub anim_id: AnimationId,
    /// Whether this command holds the id's reservation. Another group may
    /// take the id while the conversion is undone; undo must not free it then.
    owned: AtomicBool,
}

impl ConvertToItemGroup {
    /// Allocate an id and build the item group property set on top of the
    /// entity's existing properties.
    pub fn new(world: &mut World, entity: Entity) -> anyhow::Result<Self> {
        if world.get_entity(entity).is_err() {
            bail!("cannot convert {entity} into an item group: entity does not exist");
        }
        let (defaults, anim_id) =
            construct_item_group(&mut world.get_resource_or_init::<AnimationIds>())?;
        let mut properties = world
            .get::<CustomProperties>(entity)
            .cloned()
            .unwrap_or_default();
        properties.merge(&defaults);
        Ok(Self {
            properties: SetCustomProperties::capture(world, entity, properties),
            anim_id,
            // Allocation already reserved the id.
            owned: AtomicBool::new(true),
        })
    }
}

impl EditorCommand for ConvertToItemGroup {
    fn execute(&self, world: &mut World) {
        if !self.owned.load(Ordering::Relaxed) {
            let reserved = world
                .get_resource_or_init::<AnimationIds>()
                .reserve(self.anim_id);
            if !reserved {
                warn!(
                    "animation id {} is already used by another item group",
                    self.anim_id
                );
            }
            self.owned.store(reserved, Ordering::Relaxed);
        }
        self.properties.execute(world);
    }

    fn undo(&self, world: &mut World) {
        self.properties.undo(world);
        if self.owned.swap(false, Ordering::Relaxed) {
            world
                .get_resource_or_init::<AnimationIds>()
                .release(self.anim_id);
        }
    }

    fn description(&self) -> &str {
        "Convert to item group"
    }
}

/// Convert `entity` into an item group as one undoable step.
pub fn convert_to_item_group(world: &mut World, entity: Entity) -> anyhow::Result<AnimationId> {
    let command = match ConvertToItemGroup::new(world, entity) {
        Ok(command) => command,
        Err(err) => {
            warn!("{err:#}");
            return Err(err);
        }
    };
    let anim_id = command.anim_id;
    execute_command(world, Box::new(command));
    info!("converted {entity} into item group with animation id {anim_id}");
    Ok(anim_id)
}

/// Reserve the ids of item groups that arrive with their properties already
/// set, e.g. from a loaded scene, so new groups never reuse them.
fn register_loaded_anim_ids(
    mut ids: ResMut<AnimationIds>,
    added: Query<(Entity, &CustomProperties), Added<CustomProperties>>,
) {
    for (entity, properties) in &added {
        let Some(PropertyValue::Int(raw)) = properties.get("animId") else {
            continue;
        };
        let Some(id) = u16::try_from(*raw).ok().and_then(AnimationId::new) else {
            warn!("{entity} has an animId outside 1..=65535: {raw}");
            continue;
        };
        if ids.reserve(id) {
            debug!("registered animation id {id} from {entity}");
        }
    }
}

#[cfg(test)]
mod tests {
    use stagehand_export::descriptors::item_group::DISCRIMINANT_KEY;

    use super::*;
    use crate::commands::{CommandHistory, redo, undo};

    fn world() -> World {
        let mut world = World::new();
        world.init_resource::<CommandHistory>();
        world.insert_resource(AnimationIds(AnimationIdAllocator::with_seed(8)));
        world
    }

    #[test]
    fn conversion_keeps_existing_properties() {
        let mut world = world();
        let entity = world
            .spawn(CustomProperties::default().with("note", PropertyValue::String("lift".into())))
            .id();

        let id = convert_to_item_group(&mut world, entity).unwrap();
        let properties = world.get::<CustomProperties>(entity).unwrap();
        assert!(properties.contains(DISCRIMINANT_KEY));
        assert!(properties.contains("note"));
        assert_eq!(
            properties.get("animId"),
            Some(&PropertyValue::Int(id.get().into()))
        );
        assert!(world.resource::<AnimationIds>().contains(id));
    }

    #[test]
    fn undo_releases_and_redo_reserves() {
        let mut world = world();
        let entity = world.spawn_empty().id();
        let id = convert_to_item_group(&mut world, entity).unwrap();

        undo(&mut world);
        assert!(world.get::<CustomProperties>(entity).is_none());
        assert!(!world.resource::<AnimationIds>().contains(id));

        redo(&mut world);
        assert!(world.resource::<AnimationIds>().contains(id));
        assert!(world.get::<CustomProperties>(entity).is_some());
    }

    #[test]
    fn despawned_entity_allocates_nothing() {
        let mut world = world();
        let entity = world.spawn_empty().id();
        world.despawn(entity);

        assert!(convert_to_item_group(&mut world, entity).is_err());
        assert!(world.resource::<AnimationIds>().is_empty());
        assert!(world.resource::<CommandHistory>().undo_stack.is_empty());
    }

    #[test]
    fn redo_does_not_free_an_id_taken_meanwhile() {
        let mut world = world();
        let entity = world.spawn_empty().id();
        let id = convert_to_item_group(&mut world, entity).unwrap();

        undo(&mut world);
        assert!(world.resource_mut::<AnimationIds>().reserve(id));
        redo(&mut world);
        undo(&mut world);

        assert!(world.resource::<AnimationIds>().contains(id));
    }

    #[test]
    fn loaded_ids_are_reserved() {
        let mut app = App::new();
        app.add_plugins(ItemGroupPlugin);
        app.world_mut().spawn(
            CustomProperties::default()
                .with("animId", PropertyValue::Int(77))
                .with(DISCRIMINANT_KEY, PropertyValue::Float(0.0)),
        );
        app.update();
        let id = AnimationId::new(77).unwrap();
        assert!(app.world().resource::<AnimationIds>().contains(id));
    }
}
