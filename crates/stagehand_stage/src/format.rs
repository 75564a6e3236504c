//! Intermediate stage document handed to the serializer.
//!
//! Field order in every node is the order the target format expects; serde
//! emits struct fields in declaration order, so do not reorder them.

use bevy::math::DVec3;
use serde::{Deserialize, Serialize};

use crate::StageFormatError;

/// Top-level exported document.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StageDocument {
    pub header: StageHeader,
    pub stage: StageNode,
}

impl StageDocument {
    pub fn new(stage: StageNode) -> Self {
        Self {
            header: StageHeader::default(),
            stage,
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String, StageFormatError> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    pub fn from_json(json: &str) -> Result<Self, StageFormatError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Format version and tool info.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StageHeader {
    /// Semantic version triple `[major, minor, patch]`.
    pub format_version: [u32; 3],
    /// Version of the exporter that wrote this file.
    pub exporter_version: String,
}

impl Default for StageHeader {
    fn default() -> Self {
        Self {
            format_version: [1, 0, 0],
            exporter_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage node
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct StageNode {
    pub name: String,
    #[serde(default)]
    pub model_imports: Vec<String>,
    pub fallout_plane: FalloutPlane,
    #[serde(default)]
    pub item_groups: Vec<ItemGroupNode>,
    /// Objects that are not inside any item group.
    #[serde(default)]
    pub objects: Vec<ObjectNode>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct FalloutPlane {
    pub y: f64,
}

// ---------------------------------------------------------------------------
// Vector nodes
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl From<DVec3> for Xyz {
    fn from(v: DVec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<Xyz> for DVec3 {
    fn from(v: Xyz) -> Self {
        DVec3::new(v.x, v.y, v.z)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Xy {
    pub x: f64,
    pub y: f64,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
pub struct Xz<T> {
    pub x: T,
    pub z: T,
}

// ---------------------------------------------------------------------------
// Enumerated tokens
// ---------------------------------------------------------------------------

/// Playback state of an animation group. Also the action a switch performs.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimState {
    Pause,
    Play,
    PlayBackwards,
    FastForward,
    Rewind,
}

impl AnimState {
    pub const ALL: [Self; 5] = [
        Self::Pause,
        Self::Play,
        Self::PlayBackwards,
        Self::FastForward,
        Self::Rewind,
    ];

    /// `0..=4` in declaration order; anything else is rejected.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// How an item group's animation repeats.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LoopType {
    #[serde(rename = "PLAY_ONCE_ANIMATION")]
    PlayOnce,
    #[serde(rename = "LOOPING_ANIMATION")]
    Looping,
    #[serde(rename = "SEESAW")]
    Seesaw,
}

impl LoopType {
    /// `0 => PlayOnce`, `1 => Looping`, `2 => Seesaw`.
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::PlayOnce),
            1 => Some(Self::Looping),
            2 => Some(Self::Seesaw),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GoalType {
    Blue,
    Green,
    Red,
}

impl GoalType {
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(Self::Blue),
            1 => Some(Self::Green),
            2 => Some(Self::Red),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BananaType {
    Single,
    Bunch,
}

// ---------------------------------------------------------------------------
// Item group
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ItemGroupNode {
    pub name: String,
    pub rotation_center: Xyz,
    pub initial_rotation: Xyz,
    pub anim_loop_time: f64,
    pub anim_group_id: u16,
    pub anim_initial_state: AnimState,
    pub anim_seesaw_type: LoopType,
    pub conveyor_speed: Xyz,
    pub seesaw_sensitivity: f64,
    pub seesaw_friction: f64,
    pub seesaw_spring: f64,
    pub texture_scroll: Xy,
    pub collision_grid: CollisionGridNode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationNode>,
    /// Gameplay objects parented under this item group.
    #[serde(default)]
    pub objects: Vec<ObjectNode>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct CollisionGridNode {
    pub start: Xz<f64>,
    pub step: Xz<f64>,
    pub count: Xz<u32>,
}

// ---------------------------------------------------------------------------
// Animation subtree
// ---------------------------------------------------------------------------

/// Engine-space animation channel. Declaration order is emission order.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "camelCase")]
pub enum AnimChannel {
    PosX,
    PosY,
    PosZ,
    RotX,
    RotY,
    RotZ,
}

/// Baked keys are dense enough that linear is the only easing written.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Easing {
    Linear,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct KeyframeNode {
    /// Seconds from the start of the loop.
    pub time: f64,
    pub value: f64,
    pub easing: Easing,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AnimationTrack {
    pub channel: AnimChannel,
    pub keyframes: Vec<KeyframeNode>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct AnimationNode {
    /// Sorted by channel, at most one track per channel.
    pub tracks: Vec<AnimationTrack>,
}

impl AnimationNode {
    pub fn track(&self, channel: AnimChannel) -> Option<&AnimationTrack> {
        self.tracks.iter().find(|t| t.channel == channel)
    }
}

// ---------------------------------------------------------------------------
// Other stage objects
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectNode {
    Start {
        position: Xyz,
        rotation: Xyz,
    },
    #[serde(rename_all = "camelCase")]
    Goal {
        position: Xyz,
        rotation: Xyz,
        goal_type: GoalType,
    },
    Bumper {
        position: Xyz,
        rotation: Xyz,
        scale: Xyz,
    },
    Jamabar {
        position: Xyz,
        rotation: Xyz,
        scale: Xyz,
    },
    #[serde(rename_all = "camelCase")]
    Banana {
        position: Xyz,
        banana_type: BananaType,
    },
    ConeCollision {
        position: Xyz,
        rotation: Xyz,
        radius: f64,
        height: f64,
    },
    SphereCollision {
        position: Xyz,
        radius: f64,
    },
    CylinderCollision {
        position: Xyz,
        rotation: Xyz,
        radius: f64,
        height: f64,
    },
    FalloutVolume {
        position: Xyz,
        rotation: Xyz,
        size: Xyz,
    },
    #[serde(rename_all = "camelCase")]
    Switch {
        position: Xyz,
        rotation: Xyz,
        switch_type: AnimState,
        linked_id: u16,
    },
    Windmill {
        position: Xyz,
        rotation: Xyz,
    },
    Booster {
        position: Xyz,
        rotation: Xyz,
        scale: Xyz,
    },
    GolfHole {
        position: Xyz,
        rotation: Xyz,
        scale: Xyz,
    },
}

impl ObjectNode {
    pub fn position(&self) -> Xyz {
        match self {
            Self::Start { position, .. }
            | Self::Goal { position, .. }
            | Self::Bumper { position, .. }
            | Self::Jamabar { position, .. }
            | Self::Banana { position, .. }
            | Self::ConeCollision { position, .. }
            | Self::SphereCollision { position, .. }
            | Self::CylinderCollision { position, .. }
            | Self::FalloutVolume { position, .. }
            | Self::Switch { position, .. }
            | Self::Windmill { position, .. }
            | Self::Booster { position, .. }
            | Self::GolfHole { position, .. } => *position,
        }
    }
}
