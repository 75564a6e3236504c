//! Animation sampling: relative offsets for overlays and baked keyframe
//! tracks for the export document.

use bevy::math::DVec3;
use stagehand_stage::{
    AnimChannel, AnimationNode, AnimationTrack, ChannelProperty, ChannelTarget, Easing,
    KeyframeNode,
};

use crate::scene::{AnimationChannel, SceneTiming};

/// Per-axis `curve(target) - curve(reference)` for the channels driving
/// `property`. Axes without a channel stay at zero.
pub fn sample_delta(
    channels: &[AnimationChannel],
    property: ChannelProperty,
    reference_frame: i64,
    target_frame: i64,
) -> DVec3 {
    let mut delta = DVec3::ZERO;
    for axis in 0..3 {
        let target = ChannelTarget { property, axis };
        if let Some(channel) = channels.iter().find(|c| c.target == target) {
            delta[axis] =
                channel.evaluate(target_frame as f64) - channel.evaluate(reference_frame as f64);
        }
    }
    delta
}

/// Offset of an animated object at the current frame relative to the first
/// frame of the scene. Editor space; rotation in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AnimationOffset {
    pub position: DVec3,
    pub rotation: DVec3,
}

pub fn overlay_offset(channels: &[AnimationChannel], timing: &SceneTiming) -> AnimationOffset {
    AnimationOffset {
        position: sample_delta(
            channels,
            ChannelProperty::Location,
            timing.frame_start,
            timing.current_frame,
        ),
        rotation: sample_delta(
            channels,
            ChannelProperty::RotationEuler,
            timing.frame_start,
            timing.current_frame,
        ),
    }
}

// ---------------------------------------------------------------------------
// Baking
// ---------------------------------------------------------------------------

/// Engine channel an editor channel lands on.
fn engine_channel(target: ChannelTarget) -> Option<AnimChannel> {
    use AnimChannel::*;
    use ChannelProperty::*;
    match (target.property, target.axis) {
        (Location, 0) => Some(PosX),
        (Location, 1) => Some(PosZ),
        (Location, 2) => Some(PosY),
        (RotationEuler, 0) => Some(RotX),
        (RotationEuler, 1) => Some(RotZ),
        (RotationEuler, 2) => Some(RotY),
        _ => None,
    }
}

/// Convert an editor-space channel value for its engine channel. Forward (Y)
/// becomes -Z, and rotations go from radians to degrees.
fn engine_value(channel: AnimChannel, value: f64) -> f64 {
    match channel {
        AnimChannel::PosX | AnimChannel::PosY => value,
        AnimChannel::PosZ => -value,
        AnimChannel::RotX | AnimChannel::RotY => value.to_degrees(),
        AnimChannel::RotZ => (-value).to_degrees(),
    }
}

/// Whether `bake_animation` would produce tracks for these channels.
pub fn has_bakeable_channels(channels: &[AnimationChannel]) -> bool {
    channels.iter().any(|c| engine_channel(c.target).is_some())
}

/// Frames sampled for baking: `frame_start`, every `timestep` frames after it,
/// and always `frame_end`. A non-positive timestep means every frame.
pub fn bake_frames(timing: &SceneTiming, timestep: i64) -> Vec<i64> {
    let step = if timestep > 0 { timestep as usize } else { 1 };
    if timing.frame_end < timing.frame_start {
        return vec![timing.frame_start];
    }
    let mut frames: Vec<i64> = (timing.frame_start..=timing.frame_end).step_by(step).collect();
    if frames.last() != Some(&timing.frame_end) {
        frames.push(timing.frame_end);
    }
    frames
}

/// Sample every transform channel into engine-space keyframe tracks.
///
/// Returns `None` when the object has no location or rotation channel.
pub fn bake_animation(
    channels: &[AnimationChannel],
    timing: &SceneTiming,
    timestep: i64,
) -> Option<AnimationNode> {
    let mut mapped: Vec<(AnimChannel, &AnimationChannel)> = Vec::new();
    for channel in channels {
        let Some(engine) = engine_channel(channel.target) else {
            continue;
        };
        // First channel per target wins, matching `SceneObject::channel`.
        if mapped.iter().any(|(c, _)| *c == engine) {
            continue;
        }
        mapped.push((engine, channel));
    }
    if mapped.is_empty() {
        return None;
    }
    mapped.sort_by_key(|(c, _)| *c);

    debug_assert!(timing.fps_is_valid(), "baking at {} fps", timing.fps);
    let frames = bake_frames(timing, timestep);
    let tracks: Vec<AnimationTrack> = mapped
        .into_iter()
        .map(|(engine, channel)| AnimationTrack {
            channel: engine,
            keyframes: frames
                .iter()
                .map(|&frame| KeyframeNode {
                    time: (frame - timing.frame_start) as f64 / timing.fps,
                    value: engine_value(engine, channel.evaluate(frame as f64)),
                    easing: Easing::Linear,
                })
                .collect(),
        })
        .collect();

    debug_assert!(tracks.windows(2).all(|w| w[0].channel < w[1].channel));
    Some(AnimationNode { tracks })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear(slope: f64) -> impl Fn(f64) -> f64 + Send + Sync {
        move |frame| frame * slope
    }

    #[test]
    fn delta_per_axis_with_missing_axes_at_zero() {
        let channels = vec![
            AnimationChannel::new(ChannelTarget::location(0), linear(2.0)),
            AnimationChannel::new(ChannelTarget::location(2), linear(-1.0)),
            AnimationChannel::new(ChannelTarget::rotation(1), linear(0.5)),
        ];
        let delta = sample_delta(&channels, ChannelProperty::Location, 1, 11);
        assert_eq!(delta, DVec3::new(20.0, 0.0, -10.0));

        let timing = SceneTiming {
            frame_start: 1,
            frame_end: 100,
            fps: 60.0,
            current_frame: 5,
        };
        let offset = overlay_offset(&channels, &timing);
        assert_eq!(offset.position, DVec3::new(8.0, 0.0, -4.0));
        assert_eq!(offset.rotation, DVec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn no_channels_means_no_offset() {
        let offset = overlay_offset(&[], &SceneTiming::default());
        assert_eq!(offset, AnimationOffset::default());
    }

    #[test]
    fn frames_always_include_the_end() {
        let timing = SceneTiming {
            frame_start: 0,
            frame_end: 10,
            ..Default::default()
        };
        assert_eq!(bake_frames(&timing, 4), vec![0, 4, 8, 10]);
        assert_eq!(bake_frames(&timing, 5), vec![0, 5, 10]);
        assert_eq!(bake_frames(&timing, -1).len(), 11);
    }

    #[test]
    fn baked_tracks_use_engine_axes() {
        let channels = vec![
            AnimationChannel::new(ChannelTarget::rotation(1), |_: f64| std::f64::consts::PI),
            AnimationChannel::new(ChannelTarget::location(1), linear(1.0)),
        ];
        let timing = SceneTiming {
            frame_start: 0,
            frame_end: 60,
            fps: 30.0,
            current_frame: 0,
        };
        let node = bake_animation(&channels, &timing, 30).unwrap();
        let order: Vec<AnimChannel> = node.tracks.iter().map(|t| t.channel).collect();
        assert_eq!(order, vec![AnimChannel::PosZ, AnimChannel::RotZ]);

        let pos_z = node.track(AnimChannel::PosZ).unwrap();
        let times: Vec<f64> = pos_z.keyframes.iter().map(|k| k.time).collect();
        let values: Vec<f64> = pos_z.keyframes.iter().map(|k| k.value).collect();
        assert_eq!(times, vec![0.0, 1.0, 2.0]);
        assert_eq!(values, vec![-0.0, -30.0, -60.0]);

        let rot_z = node.track(AnimChannel::RotZ).unwrap();
        assert!(rot_z.keyframes.iter().all(|k| (k.value + 180.0).abs() < 1e-9));
    }

    #[test]
    fn unanimated_objects_bake_to_nothing() {
        assert!(bake_animation(&[], &SceneTiming::default(), -1).is_none());
    }
}
