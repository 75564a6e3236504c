//! Read-only view of the host scene consumed by the exporter.

use std::fmt;
use std::sync::Arc;

use bevy::math::DVec3;
use stagehand_stage::{ChannelTarget, CustomProperties, KeyframeCurve};

// ---------------------------------------------------------------------------
// Curves
// ---------------------------------------------------------------------------

/// Anything that can be evaluated at a frame number.
pub trait ChannelCurve: Send + Sync {
    fn evaluate(&self, frame: f64) -> f64;
}

impl ChannelCurve for KeyframeCurve {
    fn evaluate(&self, frame: f64) -> f64 {
        self.sample(frame)
    }
}

impl<F> ChannelCurve for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn evaluate(&self, frame: f64) -> f64 {
        self(frame)
    }
}

#[derive(Clone)]
pub struct AnimationChannel {
    pub target: ChannelTarget,
    pub curve: Arc<dyn ChannelCurve>,
}

impl AnimationChannel {
    pub fn new(target: ChannelTarget, curve: impl ChannelCurve + 'static) -> Self {
        Self {
            target,
            curve: Arc::new(curve),
        }
    }

    pub fn evaluate(&self, frame: f64) -> f64 {
        self.curve.evaluate(frame)
    }
}

impl fmt::Debug for AnimationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationChannel")
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Scene objects
// ---------------------------------------------------------------------------

/// World transform in editor space. Rotation is an XYZ euler in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObjectTransform {
    pub position: DVec3,
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self {
            position: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: DVec3::ONE,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SceneObject {
    pub name: String,
    /// Explicit type marker supplied by the host. Takes precedence over the name.
    pub type_tag: Option<String>,
    pub transform: ObjectTransform,
    pub properties: CustomProperties,
    pub channels: Vec<AnimationChannel>,
    pub children: Vec<SceneObject>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Unnamed container for a list of top-level objects.
    pub fn root(children: Vec<SceneObject>) -> Self {
        Self {
            children,
            ..Default::default()
        }
    }

    pub fn with_transform(mut self, transform: ObjectTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_position(mut self, position: DVec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_properties(mut self, properties: CustomProperties) -> Self {
        self.properties = properties;
        self
    }

    pub fn with_channel(mut self, channel: AnimationChannel) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn with_child(mut self, child: SceneObject) -> Self {
        self.children.push(child);
        self
    }

    pub fn channel(&self, target: ChannelTarget) -> Option<&AnimationChannel> {
        self.channels.iter().find(|c| c.target == target)
    }
}

// ---------------------------------------------------------------------------
// Timing and host facade
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTiming {
    pub frame_start: i64,
    pub frame_end: i64,
    pub fps: f64,
    pub current_frame: i64,
}

impl Default for SceneTiming {
    fn default() -> Self {
        Self {
            frame_start: 1,
            frame_end: 250,
            fps: 60.0,
            current_frame: 1,
        }
    }
}

impl SceneTiming {
    /// Inclusive frame count divided by the frame rate.
    pub fn loop_seconds(&self) -> f64 {
        (self.frame_end - self.frame_start + 1) as f64 / self.fps
    }

    /// Frame-to-seconds conversion needs a finite, positive rate.
    pub fn fps_is_valid(&self) -> bool {
        self.fps.is_finite() && self.fps > 0.0
    }
}

/// Capabilities the host application must provide for an export.
pub trait SceneSource {
    /// Top-level objects, each carrying its subtree.
    fn scene_objects(&self) -> Vec<SceneObject>;

    fn scene_timing(&self) -> SceneTiming;
}
