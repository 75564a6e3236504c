use bevy::math::{DVec2, DVec3, UVec2};
use stagehand_geometry::{CollisionGrid, convert_euler_deg, convert_point};
use stagehand_stage::{
    AnimState, AnimationNode, CollisionGridNode, CustomProperties, ItemGroupNode, LoopType,
    PropertyValue, Xy, Xz,
};

use super::StageObjectDescriptor;
use crate::anim_id::{AnimationId, AnimationIdAllocator};
use crate::error::{AllocError, SchemaViolation, ViolationKind};
use crate::properties::{PropertyKind, PropertyReader, PropertySpec, defaults_for};
use crate::scene::{SceneObject, SceneTiming};

/// Presence of this key marks an object as an item group.
pub const DISCRIMINANT_KEY: &str = "collisionStartX";

/// `animLoopTime` value meaning "derive from the scene frame range".
pub const LOOP_TIME_FROM_SCENE: f64 = -1.0;

pub static ITEM_GROUP_SCHEMA: [PropertySpec; 20] = [
    PropertySpec::required("collisionStartX", PropertyKind::Float),
    PropertySpec::required("collisionStartY", PropertyKind::Float),
    PropertySpec::required("collisionStepX", PropertyKind::Float),
    PropertySpec::required("collisionStepY", PropertyKind::Float),
    PropertySpec::required("collisionStepCountX", PropertyKind::Int),
    PropertySpec::required("collisionStepCountY", PropertyKind::Int),
    PropertySpec::required("animId", PropertyKind::Int),
    PropertySpec::required("initPlaying", PropertyKind::Int),
    PropertySpec::required("loopAnim", PropertyKind::Int),
    PropertySpec::float_or("animLoopTime", LOOP_TIME_FROM_SCENE),
    PropertySpec::float_or("conveyorX", 0.0),
    PropertySpec::float_or("conveyorY", 0.0),
    PropertySpec::float_or("conveyorZ", 0.0),
    PropertySpec::float_or("seesawSensitivity", 0.0),
    PropertySpec::float_or("seesawFriction", 0.0),
    PropertySpec::float_or("seesawSpring", 0.0),
    PropertySpec::float_or("texScrollUSpeed", 0.0),
    PropertySpec::float_or("texScrollVSpeed", 0.0),
    PropertySpec::int_or("exportTimestep", -1),
    PropertySpec::int_or("collisionTriangleFlag", 0),
];

/// Validated item group, positions already in engine space.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemGroupSnapshot {
    pub name: String,
    pub rotation_center: DVec3,
    /// Degrees.
    pub initial_rotation: DVec3,
    pub anim_loop_time: f64,
    pub anim_id: AnimationId,
    pub initial_state: AnimState,
    pub loop_type: LoopType,
    pub conveyor: DVec3,
    pub seesaw_sensitivity: f64,
    pub seesaw_friction: f64,
    pub seesaw_spring: f64,
    pub texture_scroll: DVec2,
    pub grid: CollisionGrid,
    /// Frames between baked keyframes; non-positive means every frame.
    pub export_timestep: i64,
}

/// Resolve `animLoopTime`: the sentinel derives seconds from the inclusive
/// scene frame range, any other value is used verbatim.
pub fn resolve_loop_time(stored: f64, timing: &SceneTiming) -> f64 {
    if stored == LOOP_TIME_FROM_SCENE {
        timing.loop_seconds()
    } else {
        stored
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ItemGroupDescriptor;

impl StageObjectDescriptor for ItemGroupDescriptor {
    type Snapshot = ItemGroupSnapshot;
    type Node = ItemGroupNode;

    fn label(&self) -> &'static str {
        "item group"
    }

    fn schema(&self) -> &'static [PropertySpec] {
        &ITEM_GROUP_SCHEMA
    }

    fn validate(
        &self,
        object: &SceneObject,
        timing: &SceneTiming,
    ) -> Result<ItemGroupSnapshot, SchemaViolation> {
        let props = PropertyReader::new(&object.name, &object.properties, self.schema())?;

        // Scene timing only matters when the loop time is derived from it.
        let stored_loop_time = props.float("animLoopTime");
        if stored_loop_time == LOOP_TIME_FROM_SCENE {
            if !timing.fps_is_valid() {
                return Err(SchemaViolation::new(
                    &object.name,
                    ViolationKind::InvalidTiming {
                        reason: "frame rate must be positive",
                    },
                ));
            }
            if timing.frame_end < timing.frame_start {
                return Err(SchemaViolation::new(
                    &object.name,
                    ViolationKind::InvalidTiming {
                        reason: "scene ends before it starts",
                    },
                ));
            }
        }

        let grid = CollisionGrid {
            start: DVec2::new(props.float("collisionStartX"), props.float("collisionStartY")),
            step: DVec2::new(props.float("collisionStepX"), props.float("collisionStepY")),
            count: UVec2::new(
                props.int_in("collisionStepCountX")?,
                props.int_in("collisionStepCountY")?,
            ),
        };

        Ok(ItemGroupSnapshot {
            name: object.name.clone(),
            rotation_center: convert_point(object.transform.position),
            initial_rotation: convert_euler_deg(object.transform.rotation),
            anim_loop_time: resolve_loop_time(stored_loop_time, timing),
            anim_id: props.token("animId", |v| {
                u16::try_from(v).ok().and_then(AnimationId::new)
            })?,
            initial_state: props.token("initPlaying", AnimState::from_index)?,
            loop_type: props.token("loopAnim", LoopType::from_index)?,
            conveyor: DVec3::new(
                props.float("conveyorX"),
                props.float("conveyorY"),
                props.float("conveyorZ"),
            ),
            seesaw_sensitivity: props.float("seesawSensitivity"),
            seesaw_friction: props.float("seesawFriction"),
            seesaw_spring: props.float("seesawSpring"),
            texture_scroll: DVec2::new(
                props.float("texScrollUSpeed"),
                props.float("texScrollVSpeed"),
            ),
            grid,
            export_timestep: props.int("exportTimestep"),
        })
    }

    fn emit(&self, snapshot: ItemGroupSnapshot, animation: Option<AnimationNode>) -> ItemGroupNode {
        let grid = snapshot.grid;
        ItemGroupNode {
            name: snapshot.name,
            rotation_center: snapshot.rotation_center.into(),
            initial_rotation: snapshot.initial_rotation.into(),
            anim_loop_time: snapshot.anim_loop_time,
            anim_group_id: snapshot.anim_id.get(),
            anim_initial_state: snapshot.initial_state,
            anim_seesaw_type: snapshot.loop_type,
            conveyor_speed: snapshot.conveyor.into(),
            seesaw_sensitivity: snapshot.seesaw_sensitivity,
            seesaw_friction: snapshot.seesaw_friction,
            seesaw_spring: snapshot.seesaw_spring,
            texture_scroll: Xy {
                x: snapshot.texture_scroll.x,
                y: snapshot.texture_scroll.y,
            },
            collision_grid: CollisionGridNode {
                start: Xz {
                    x: grid.start.x,
                    z: grid.start.y,
                },
                step: Xz {
                    x: grid.step.x,
                    z: grid.step.y,
                },
                count: Xz {
                    x: grid.count.x,
                    z: grid.count.y,
                },
            },
            animation,
            objects: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

/// Property set for a newly authored item group: every optional default, a
/// default collision grid, playing + looping, and a fresh animation id.
pub fn construct_properties(
    ids: &mut AnimationIdAllocator,
) -> Result<(CustomProperties, AnimationId), AllocError> {
    let id = ids.allocate()?;
    let grid = CollisionGrid::default();

    let mut properties = defaults_for(&ITEM_GROUP_SCHEMA);
    for (key, value) in [
        ("collisionStartX", PropertyValue::Float(grid.start.x)),
        ("collisionStartY", PropertyValue::Float(grid.start.y)),
        ("collisionStepX", PropertyValue::Float(grid.step.x)),
        ("collisionStepY", PropertyValue::Float(grid.step.y)),
        ("collisionStepCountX", PropertyValue::Int(grid.count.x.into())),
        ("collisionStepCountY", PropertyValue::Int(grid.count.y.into())),
        ("animId", PropertyValue::Int(id.get().into())),
        ("initPlaying", PropertyValue::Int(1)),
        ("loopAnim", PropertyValue::Int(1)),
    ] {
        properties.insert(key, value);
    }
    Ok((properties, id))
}

#[cfg(test)]
mod tests {
    use stagehand_stage::Xyz;

    use super::*;

    fn timing() -> SceneTiming {
        SceneTiming {
            frame_start: 1,
            frame_end: 61,
            fps: 60.0,
            current_frame: 1,
        }
    }

    fn constructed() -> CustomProperties {
        let mut ids = AnimationIdAllocator::with_seed(3);
        construct_properties(&mut ids).unwrap().0
    }

    #[test]
    fn constructed_group_validates_with_defaults() {
        let object = SceneObject::new("[IG] floor").with_properties(constructed());
        let snapshot = ItemGroupDescriptor.validate(&object, &timing()).unwrap();
        assert_eq!(snapshot.grid, CollisionGrid::default());
        assert_eq!(snapshot.initial_state, AnimState::Play);
        assert_eq!(snapshot.loop_type, LoopType::Looping);
        assert_eq!(snapshot.conveyor, DVec3::ZERO);
        assert_eq!(snapshot.anim_loop_time, 61.0 / 60.0);
        assert_eq!(snapshot.export_timestep, -1);
    }

    #[test]
    fn loop_time_override_is_verbatim() {
        assert_eq!(resolve_loop_time(5.0, &timing()), 5.0);
        assert_eq!(resolve_loop_time(-1.0, &timing()), 61.0 / 60.0);
    }

    #[test]
    fn invalid_tokens_are_rejected() {
        for (key, value) in [("initPlaying", 5), ("loopAnim", 3), ("animId", 0), ("animId", 70_000)] {
            let props = constructed().with(key, PropertyValue::Int(value));
            let object = SceneObject::new("[IG] bad").with_properties(props);
            let err = ItemGroupDescriptor.validate(&object, &timing()).unwrap_err();
            assert_eq!(err.kind.key(), Some(key), "{err}");
        }
    }

    #[test]
    fn negative_step_count_is_rejected() {
        let props = constructed().with("collisionStepCountY", PropertyValue::Int(-2));
        let object = SceneObject::new("[IG]").with_properties(props);
        let err = ItemGroupDescriptor.validate(&object, &timing()).unwrap_err();
        assert_eq!(err.kind.key(), Some("collisionStepCountY"));
    }

    #[test]
    fn zero_fps_is_a_timing_violation() {
        let object = SceneObject::new("[IG]").with_properties(constructed());
        let bad = SceneTiming {
            fps: 0.0,
            ..timing()
        };
        let err = ItemGroupDescriptor.validate(&object, &bad).unwrap_err();
        assert!(matches!(err.kind, ViolationKind::InvalidTiming { .. }));
    }

    #[test]
    fn loop_time_override_ignores_scene_timing() {
        let props = constructed().with("animLoopTime", PropertyValue::Float(5.0));
        let object = SceneObject::new("[IG]").with_properties(props);
        for fps in [0.0, -24.0, f64::NAN, f64::INFINITY] {
            let bad = SceneTiming {
                fps,
                frame_end: 0,
                ..timing()
            };
            let snapshot = ItemGroupDescriptor.validate(&object, &bad).unwrap();
            assert_eq!(snapshot.anim_loop_time, 5.0);
        }
    }

    #[test]
    fn infinite_fps_is_a_timing_violation() {
        let object = SceneObject::new("[IG]").with_properties(constructed());
        let bad = SceneTiming {
            fps: f64::INFINITY,
            ..timing()
        };
        let err = ItemGroupDescriptor.validate(&object, &bad).unwrap_err();
        assert!(matches!(err.kind, ViolationKind::InvalidTiming { .. }));
    }

    #[test]
    fn emit_converts_transform_and_keeps_grid_axes() {
        let object = SceneObject::new("[IG] spinner")
            .with_properties(constructed().with("collisionStartY", PropertyValue::Float(-64.0)))
            .with_position(DVec3::new(1.0, 2.0, 3.0));
        let snapshot = ItemGroupDescriptor.validate(&object, &timing()).unwrap();
        let node = ItemGroupDescriptor.emit(snapshot, None);
        assert_eq!(node.rotation_center, Xyz::from(DVec3::new(1.0, 3.0, -2.0)));
        assert_eq!(node.collision_grid.start.z, -64.0);
        assert_eq!(node.collision_grid.count.x, 16);
        assert!(node.animation.is_none());
    }
}
