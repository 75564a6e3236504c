//! Read-only view of the ECS world as an exportable scene.

use std::f32::consts::FRAC_PI_2;

use bevy::{math::DVec3, prelude::*};
use stagehand_export::{AnimationChannel, ObjectTransform, SceneObject, SceneSource, SceneTiming};
use stagehand_stage::{CustomProperties, KeyframeCurve, StageAnimation};

use crate::{EditorEntity, StageTiming};

/// Explicit object type marker, e.g. `"[BUMPER]"`. Takes precedence over the
/// name prefix when classifying.
#[derive(Component, Reflect, Clone, Debug, Default, PartialEq)]
#[reflect(Component, Default)]
pub struct StageTag(pub String);

/// Snapshot of every stage entity, taken before export so the walk never
/// touches the world.
pub struct WorldScene {
    pub objects: Vec<SceneObject>,
    pub timing: SceneTiming,
}

impl WorldScene {
    pub fn capture(world: &mut World) -> Self {
        let timing = world
            .get_resource::<StageTiming>()
            .map(|t| t.0)
            .unwrap_or_default();

        let mut roots: Vec<Entity> = world
            .query_filtered::<Entity, (With<Transform>, Without<ChildOf>, Without<EditorEntity>)>()
            .iter(world)
            .collect();
        // Query order is storage order; entity order is stable across runs.
        roots.sort();

        let objects = roots
            .into_iter()
            .map(|entity| capture_object(world, entity, Transform::IDENTITY))
            .collect();
        Self { objects, timing }
    }
}

impl SceneSource for WorldScene {
    fn scene_objects(&self) -> Vec<SceneObject> {
        self.objects.clone()
    }

    fn scene_timing(&self) -> SceneTiming {
        self.timing
    }
}

fn capture_object(world: &World, entity: Entity, parent: Transform) -> SceneObject {
    let entity_ref = world.entity(entity);
    let local = entity_ref.get::<Transform>().copied().unwrap_or_default();
    let global = parent.mul_transform(local);

    let name = entity_ref
        .get::<Name>()
        .map(|n| n.as_str().to_string())
        .unwrap_or_default();
    let properties = entity_ref
        .get::<CustomProperties>()
        .cloned()
        .unwrap_or_default();
    let channels = entity_ref
        .get::<StageAnimation>()
        .map(animation_channels)
        .unwrap_or_default();

    let children = entity_ref
        .get::<Children>()
        .map(|children| {
            children
                .iter()
                .filter(|&child| !world.entity(child).contains::<EditorEntity>())
                .filter(|&child| world.entity(child).contains::<Transform>())
                .map(|child| capture_object(world, child, global))
                .collect()
        })
        .unwrap_or_default();

    SceneObject {
        name,
        type_tag: entity_ref.get::<StageTag>().map(|t| t.0.clone()),
        transform: object_transform(&global),
        properties,
        channels,
        children,
    }
}

/// Editor axes expressed in Bevy axes: editor X is Bevy X, editor Y (forward)
/// is Bevy -Z, editor Z (up) is Bevy Y. A quarter turn about X.
fn bevy_to_editor() -> Quat {
    Quat::from_rotation_x(FRAC_PI_2)
}

/// World transform in editor convention (Z up, Y forward): Euler angles in
/// XYZ order, radians.
pub fn object_transform(transform: &Transform) -> ObjectTransform {
    let basis = bevy_to_editor();
    let rotation = basis * transform.rotation * basis.inverse();
    let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
    let t = transform.translation;
    let s = transform.scale;
    ObjectTransform {
        position: Vec3::new(t.x, -t.z, t.y).as_dvec3(),
        rotation: Vec3::new(x, y, z).as_dvec3(),
        scale: Vec3::new(s.x, s.z, s.y).as_dvec3(),
    }
}

/// Editor-space vector back in Bevy axes.
pub fn editor_to_bevy(v: DVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.z as f32, -v.y as f32)
}

/// Channels for export and overlays. Curves are re-sorted since reflected
/// data can arrive with keys out of order.
pub fn animation_channels(animation: &StageAnimation) -> Vec<AnimationChannel> {
    animation
        .channels
        .iter()
        .map(|c| AnimationChannel::new(c.target, KeyframeCurve::new(c.curve.keys().to_vec())))
        .collect()
}
