pub mod format;
pub mod types;

use bevy::prelude::*;

// Re-export core types for consumer convenience
pub use format::{
    AnimChannel, AnimState, AnimationNode, AnimationTrack, BananaType, CollisionGridNode, Easing,
    FalloutPlane, GoalType, ItemGroupNode, KeyframeNode, LoopType, ObjectNode, StageDocument,
    StageHeader, StageNode, Xy, Xyz, Xz,
};
pub use types::{
    ChannelProperty, ChannelTarget, CustomProperties, Keyframe, KeyframeChannel, KeyframeCurve,
    PropertyValue, StageAnimation,
};

// Re-export geometry crate
pub use stagehand_geometry;

pub struct StageTypesPlugin;

impl Plugin for StageTypesPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CustomProperties>()
            .register_type::<PropertyValue>()
            .register_type::<StageAnimation>()
            .register_type::<KeyframeChannel>()
            .register_type::<KeyframeCurve>()
            .register_type::<Keyframe>()
            .register_type::<ChannelTarget>()
            .register_type::<ChannelProperty>();
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StageFormatError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
