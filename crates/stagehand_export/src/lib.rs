//! Stage exporter: turns authored scene objects into a typed stage document.
//!
//! The host supplies a [`SceneSource`] (or a [`SceneObject`] tree directly);
//! [`export_stage`] classifies each object, validates its properties against
//! the matching descriptor's schema and appends the emitted node. Objects that
//! fail validation are skipped and reported in [`ExportReport::errors`].

pub mod anim_id;
pub mod assembly;
pub mod descriptors;
pub mod error;
pub mod properties;
pub mod sampling;
pub mod scene;
pub mod settings;

pub use anim_id::{AnimationId, AnimationIdAllocator};
pub use assembly::{ExportReport, export_scene, export_stage};
pub use descriptors::item_group::construct_properties as construct_item_group;
pub use descriptors::{ObjectKind, StageObjectDescriptor};
pub use error::{AllocError, SchemaViolation, ViolationKind};
pub use sampling::{AnimationOffset, overlay_offset, sample_delta};
pub use scene::{AnimationChannel, ChannelCurve, ObjectTransform, SceneObject, SceneSource, SceneTiming};
pub use settings::{ExportSettings, ObjectOrdering};

// Re-export the document crate
pub use stagehand_stage;
