use bevy::math::DVec3;
use stagehand_geometry::{CollisionShape, convert_euler_deg, convert_point, convert_scale};
use stagehand_stage::{AnimationNode, GoalType, ObjectNode};

use super::{ObjectKind, StageObjectDescriptor};
use crate::error::SchemaViolation;
use crate::properties::{PropertyReader, PropertySpec};
use crate::scene::{SceneObject, SceneTiming};

/// `goalType` value meaning "use the color from the name marker".
pub const GOAL_TYPE_FROM_MARKER: i64 = -1;

static GOAL_SCHEMA: [PropertySpec; 1] = [PropertySpec::int_or("goalType", GOAL_TYPE_FROM_MARKER)];
static SWITCH_SCHEMA: [PropertySpec; 1] = [PropertySpec::int_or("linkedId", 0)];
static TRANSFORM_ONLY: [PropertySpec; 0] = [];

/// Validated non-item-group object. Position/rotation in engine space,
/// rotation in degrees; scale still in editor axes.
#[derive(Clone, Debug, PartialEq)]
pub struct ObjectSnapshot {
    pub kind: ObjectKind,
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
    /// Animation group a switch drives. Zero for everything else.
    pub linked_id: u16,
}

/// Descriptor for every object type whose node is transform plus fixed fields.
#[derive(Clone, Copy, Debug)]
pub struct ObjectDescriptor(pub ObjectKind);

impl StageObjectDescriptor for ObjectDescriptor {
    type Snapshot = ObjectSnapshot;
    type Node = ObjectNode;

    fn label(&self) -> &'static str {
        match self.0 {
            ObjectKind::ItemGroup => "item group",
            ObjectKind::Start => "start",
            ObjectKind::Goal(_) => "goal",
            ObjectKind::Bumper => "bumper",
            ObjectKind::Jamabar => "jamabar",
            ObjectKind::Banana(_) => "banana",
            ObjectKind::ConeCollision => "cone collision",
            ObjectKind::SphereCollision => "sphere collision",
            ObjectKind::CylinderCollision => "cylinder collision",
            ObjectKind::FalloutVolume => "fallout volume",
            ObjectKind::Switch(_) => "switch",
            ObjectKind::Windmill => "windmill",
            ObjectKind::Booster => "booster",
            ObjectKind::GolfHole => "golf hole",
        }
    }

    fn schema(&self) -> &'static [PropertySpec] {
        match self.0 {
            ObjectKind::Goal(_) => &GOAL_SCHEMA,
            ObjectKind::Switch(_) => &SWITCH_SCHEMA,
            _ => &TRANSFORM_ONLY,
        }
    }

    fn validate(
        &self,
        object: &SceneObject,
        _timing: &SceneTiming,
    ) -> Result<ObjectSnapshot, SchemaViolation> {
        assert!(
            self.0 != ObjectKind::ItemGroup,
            "item groups have their own descriptor"
        );
        let props = PropertyReader::new(&object.name, &object.properties, self.schema())?;

        let kind = match self.0 {
            ObjectKind::Goal(marker_color) => {
                let color = props.token("goalType", |v| match v {
                    GOAL_TYPE_FROM_MARKER => Some(marker_color),
                    other => GoalType::from_index(other),
                })?;
                ObjectKind::Goal(color)
            }
            other => other,
        };
        let linked_id = match kind {
            ObjectKind::Switch(_) => props.int_in("linkedId")?,
            _ => 0,
        };

        Ok(ObjectSnapshot {
            kind,
            position: convert_point(object.transform.position),
            rotation: convert_euler_deg(object.transform.rotation),
            scale: object.transform.scale,
            linked_id,
        })
    }

    fn emit(&self, snapshot: ObjectSnapshot, _animation: Option<AnimationNode>) -> ObjectNode {
        let position = snapshot.position.into();
        let rotation = snapshot.rotation.into();
        let scale = convert_scale(snapshot.scale).into();
        match snapshot.kind {
            ObjectKind::Start => ObjectNode::Start { position, rotation },
            ObjectKind::Goal(goal_type) => ObjectNode::Goal {
                position,
                rotation,
                goal_type,
            },
            ObjectKind::Bumper => ObjectNode::Bumper {
                position,
                rotation,
                scale,
            },
            ObjectKind::Jamabar => ObjectNode::Jamabar {
                position,
                rotation,
                scale,
            },
            ObjectKind::Banana(banana_type) => ObjectNode::Banana {
                position,
                banana_type,
            },
            ObjectKind::ConeCollision => {
                let extents = CollisionShape::Cone.extents(snapshot.scale);
                ObjectNode::ConeCollision {
                    position,
                    rotation,
                    radius: extents.radius,
                    height: extents.height,
                }
            }
            ObjectKind::SphereCollision => ObjectNode::SphereCollision {
                position,
                radius: CollisionShape::Sphere.extents(snapshot.scale).radius,
            },
            ObjectKind::CylinderCollision => {
                let extents = CollisionShape::Cylinder.extents(snapshot.scale);
                ObjectNode::CylinderCollision {
                    position,
                    rotation,
                    radius: extents.radius,
                    height: extents.height,
                }
            }
            ObjectKind::FalloutVolume => ObjectNode::FalloutVolume {
                position,
                rotation,
                size: scale,
            },
            ObjectKind::Switch(switch_type) => ObjectNode::Switch {
                position,
                rotation,
                switch_type,
                linked_id: snapshot.linked_id,
            },
            ObjectKind::Windmill => ObjectNode::Windmill { position, rotation },
            ObjectKind::Booster => ObjectNode::Booster {
                position,
                rotation,
                scale,
            },
            ObjectKind::GolfHole => ObjectNode::GolfHole {
                position,
                rotation,
                scale,
            },
            ObjectKind::ItemGroup => unreachable!("rejected in validate"),
        }
    }
}
