use bevy::prelude::*;
use stagehand_export::descriptors::item_group::DISCRIMINANT_KEY;
use stagehand_export::overlay_offset;
use stagehand_stage::{CustomProperties, StageAnimation};

use crate::StageTiming;
use crate::scene_facade::{animation_channels, editor_to_bevy};

pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, update_animation_offsets);
    }
}

/// Offset of an animated item group at the current frame relative to the
/// first frame, in Bevy axes; rotation in radians per axis. Overlays draw the
/// group's collision grid and conveyor vectors shifted by this amount.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct OverlayOffset {
    pub translation: Vec3,
    pub rotation: Vec3,
}

fn update_animation_offsets(
    mut commands: Commands,
    timing: Res<StageTiming>,
    groups: Query<(Entity, &CustomProperties, &StageAnimation, Option<&OverlayOffset>)>,
    stale: Query<Entity, (With<OverlayOffset>, Without<StageAnimation>)>,
) {
    for (entity, properties, animation, current) in &groups {
        if !properties.contains(DISCRIMINANT_KEY) {
            continue;
        }
        let offset = overlay_offset(&animation_channels(animation), &timing);
        // Channels are authored in editor axes.
        let offset = OverlayOffset {
            translation: editor_to_bevy(offset.position),
            rotation: editor_to_bevy(offset.rotation),
        };
        if current != Some(&offset) {
            commands.entity(entity).insert(offset);
        }
    }
    for entity in &stale {
        commands.entity(entity).remove::<OverlayOffset>();
    }
}

#[cfg(test)]
mod tests {
    use stagehand_export::SceneTiming;
    use stagehand_stage::{ChannelTarget, Keyframe, KeyframeChannel, KeyframeCurve, PropertyValue};

    use super::*;

    fn slide() -> StageAnimation {
        StageAnimation {
            channels: vec![KeyframeChannel {
                target: ChannelTarget::location(1),
                curve: KeyframeCurve::new(vec![
                    Keyframe { frame: 1.0, value: 0.0 },
                    Keyframe { frame: 11.0, value: 10.0 },
                ]),
            }],
        }
    }

    #[test]
    fn item_groups_get_offset_at_current_frame() {
        let mut app = App::new();
        app.add_plugins(OverlayPlugin);
        app.insert_resource(StageTiming(SceneTiming {
            frame_start: 1,
            frame_end: 11,
            fps: 60.0,
            current_frame: 6,
        }));
        let group = app
            .world_mut()
            .spawn((
                CustomProperties::default().with(DISCRIMINANT_KEY, PropertyValue::Float(0.0)),
                slide(),
            ))
            .id();
        let plain = app
            .world_mut()
            .spawn((CustomProperties::default(), slide()))
            .id();

        app.update();

        let offset = app.world().get::<OverlayOffset>(group).unwrap();
        // Editor forward is Bevy -Z.
        assert_eq!(offset.translation, Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(offset.rotation, Vec3::ZERO);
        assert!(app.world().get::<OverlayOffset>(plain).is_none());
    }
}
