//! One descriptor per gameplay object type.
//!
//! A descriptor lifts an object's free-form properties into a typed snapshot
//! (`validate`) and turns that snapshot into a document node (`emit`).

pub mod item_group;
pub mod object;

use stagehand_stage::{AnimState, AnimationNode, BananaType, GoalType};

use crate::error::SchemaViolation;
use crate::properties::PropertySpec;
use crate::scene::{SceneObject, SceneTiming};

pub use item_group::{ItemGroupDescriptor, ItemGroupSnapshot};
pub use object::{ObjectDescriptor, ObjectSnapshot};

pub trait StageObjectDescriptor {
    type Snapshot;
    type Node;

    /// Human-readable type name for logs.
    fn label(&self) -> &'static str;

    fn schema(&self) -> &'static [PropertySpec];

    fn validate(
        &self,
        object: &SceneObject,
        timing: &SceneTiming,
    ) -> Result<Self::Snapshot, SchemaViolation>;

    /// `animation` is only consumed by descriptors whose nodes carry an
    /// animation subtree.
    fn emit(&self, snapshot: Self::Snapshot, animation: Option<AnimationNode>) -> Self::Node;
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    ItemGroup,
    Start,
    Goal(GoalType),
    Bumper,
    Jamabar,
    Banana(BananaType),
    ConeCollision,
    SphereCollision,
    CylinderCollision,
    FalloutVolume,
    Switch(AnimState),
    Windmill,
    Booster,
    GolfHole,
}

/// Name markers, matched as prefixes of the object name.
const MARKERS: &[(&str, ObjectKind)] = &[
    ("[IG]", ObjectKind::ItemGroup),
    ("[START]", ObjectKind::Start),
    ("[GOAL_B]", ObjectKind::Goal(GoalType::Blue)),
    ("[GOAL_G]", ObjectKind::Goal(GoalType::Green)),
    ("[GOAL_R]", ObjectKind::Goal(GoalType::Red)),
    ("[BUMPER]", ObjectKind::Bumper),
    ("[JAMABAR]", ObjectKind::Jamabar),
    ("[BANANA_S]", ObjectKind::Banana(BananaType::Single)),
    ("[BANANA_B]", ObjectKind::Banana(BananaType::Bunch)),
    ("[COLI_CONE]", ObjectKind::ConeCollision),
    ("[COLI_SPHERE]", ObjectKind::SphereCollision),
    ("[COLI_CYLINDER]", ObjectKind::CylinderCollision),
    ("[FALLOUT_VOL]", ObjectKind::FalloutVolume),
    ("[SW_PAUSE]", ObjectKind::Switch(AnimState::Pause)),
    ("[SW_PLAY]", ObjectKind::Switch(AnimState::Play)),
    ("[SW_PLAY_BACKWARDS]", ObjectKind::Switch(AnimState::PlayBackwards)),
    ("[SW_FAST_FORWARD]", ObjectKind::Switch(AnimState::FastForward)),
    ("[SW_REWIND]", ObjectKind::Switch(AnimState::Rewind)),
    ("[WH]", ObjectKind::Windmill),
    ("[BOOSTER]", ObjectKind::Booster),
    ("[GOLF_HOLE]", ObjectKind::GolfHole),
];

impl ObjectKind {
    /// Kind for an exact marker. Brackets are optional: `"IG"` and `"[IG]"` match.
    pub fn from_marker(tag: &str) -> Option<Self> {
        let bare = tag.trim().trim_start_matches('[').trim_end_matches(']');
        MARKERS
            .iter()
            .find(|(marker, _)| &marker[1..marker.len() - 1] == bare)
            .map(|(_, kind)| *kind)
    }

    /// Explicit host tag first, then the name marker, then the item group
    /// discriminant key. `None` means plain geometry.
    pub fn classify(object: &SceneObject) -> Option<Self> {
        if let Some(tag) = &object.type_tag {
            return Self::from_marker(tag);
        }
        if let Some((_, kind)) = MARKERS
            .iter()
            .find(|(marker, _)| object.name.starts_with(marker))
        {
            return Some(*kind);
        }
        object
            .properties
            .contains(item_group::DISCRIMINANT_KEY)
            .then_some(Self::ItemGroup)
    }
}

#[cfg(test)]
mod tests {
    use stagehand_stage::{CustomProperties, PropertyValue};

    use super::*;

    #[test]
    fn every_marker_resolves_to_its_kind() {
        for (marker, kind) in MARKERS {
            assert_eq!(ObjectKind::from_marker(marker), Some(*kind));
        }
        assert_eq!(ObjectKind::from_marker("IG"), Some(ObjectKind::ItemGroup));
        assert_eq!(ObjectKind::from_marker("[NOPE]"), None);
    }

    #[test]
    fn classification_precedence() {
        let tagged = SceneObject {
            type_tag: Some("[BUMPER]".into()),
            ..SceneObject::new("[START] misleading")
        };
        assert_eq!(ObjectKind::classify(&tagged), Some(ObjectKind::Bumper));

        let named = SceneObject::new("[SW_PLAY_BACKWARDS] lever");
        assert_eq!(
            ObjectKind::classify(&named),
            Some(ObjectKind::Switch(AnimState::PlayBackwards))
        );

        let keyed = SceneObject::new("Platform").with_properties(
            CustomProperties::default().with("collisionStartX", PropertyValue::Float(0.0)),
        );
        assert_eq!(ObjectKind::classify(&keyed), Some(ObjectKind::ItemGroup));

        assert_eq!(ObjectKind::classify(&SceneObject::new("Cube.001")), None);
    }
}
