//! Scene walk that dispatches objects to descriptors and assembles the document.

use stagehand_stage::{FalloutPlane, ItemGroupNode, ObjectNode, StageDocument, StageNode};

use crate::descriptors::{ItemGroupDescriptor, ObjectDescriptor, ObjectKind, StageObjectDescriptor};
use crate::error::{SchemaViolation, ViolationKind};
use crate::sampling::{bake_animation, has_bakeable_channels};
use crate::scene::{SceneObject, SceneSource, SceneTiming};
use crate::settings::{ExportSettings, ObjectOrdering};

/// Result of an export: the document built from every valid object, plus the
/// violations of the objects that were skipped.
#[derive(Clone, Debug)]
pub struct ExportReport {
    pub document: StageDocument,
    pub errors: Vec<SchemaViolation>,
}

impl ExportReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Export everything the host reports, under a synthetic root.
pub fn export_scene(source: &impl SceneSource, settings: &ExportSettings) -> ExportReport {
    let root = SceneObject::root(source.scene_objects());
    export_stage(&root, &source.scene_timing(), settings)
}

/// Walk `root` depth-first and build the stage document.
pub fn export_stage(
    root: &SceneObject,
    timing: &SceneTiming,
    settings: &ExportSettings,
) -> ExportReport {
    let name = if settings.stage_name.is_empty() {
        root.name.clone()
    } else {
        settings.stage_name.clone()
    };

    let mut walk = Walk {
        timing,
        settings,
        item_groups: Vec::new(),
        objects: Vec::new(),
        errors: Vec::new(),
    };
    walk.visit(root, None);

    tracing::info!(
        "exported stage '{name}': {} item groups, {} loose objects, {} errors",
        walk.item_groups.len(),
        walk.objects.len(),
        walk.errors.len()
    );

    ExportReport {
        document: StageDocument::new(StageNode {
            name,
            model_imports: settings.model_imports.clone(),
            fallout_plane: FalloutPlane {
                y: settings.fallout_plane_y,
            },
            item_groups: walk.item_groups,
            objects: walk.objects,
        }),
        errors: walk.errors,
    }
}

struct Walk<'a> {
    timing: &'a SceneTiming,
    settings: &'a ExportSettings,
    item_groups: Vec<ItemGroupNode>,
    objects: Vec<ObjectNode>,
    errors: Vec<SchemaViolation>,
}

impl Walk<'_> {
    /// `group` is the index of the enclosing item group node, if any.
    fn visit(&mut self, object: &SceneObject, group: Option<usize>) {
        let mut children_group = group;

        match ObjectKind::classify(object) {
            None => {}
            Some(ObjectKind::ItemGroup) => {
                if let Some(index) = self.item_group(object) {
                    children_group = Some(index);
                }
            }
            Some(kind) => self.object(object, kind, group),
        }

        match self.settings.ordering {
            ObjectOrdering::HostOrder => {
                for child in &object.children {
                    self.visit(child, children_group);
                }
            }
            ObjectOrdering::ByName => {
                let mut children: Vec<&SceneObject> = object.children.iter().collect();
                children.sort_by(|a, b| a.name.cmp(&b.name));
                for child in children {
                    self.visit(child, children_group);
                }
            }
        }
    }

    /// Append an item group node and return its index. The node is pushed
    /// before its children are visited so document order is pre-order.
    fn item_group(&mut self, object: &SceneObject) -> Option<usize> {
        let descriptor = ItemGroupDescriptor;
        tracing::debug!("processing {} {}", descriptor.label(), object.name);

        let snapshot = match descriptor.validate(object, self.timing) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                self.reject(err);
                return None;
            }
        };
        let animation = if self.settings.bake_animation {
            if has_bakeable_channels(&object.channels) && !self.timing.fps_is_valid() {
                self.reject(SchemaViolation::new(
                    &object.name,
                    ViolationKind::InvalidTiming {
                        reason: "animation needs a positive frame rate",
                    },
                ));
                return None;
            }
            bake_animation(&object.channels, self.timing, snapshot.export_timestep)
        } else {
            None
        };
        self.item_groups.push(descriptor.emit(snapshot, animation));
        Some(self.item_groups.len() - 1)
    }

    fn object(&mut self, object: &SceneObject, kind: ObjectKind, group: Option<usize>) {
        let descriptor = ObjectDescriptor(kind);
        tracing::debug!("processing {} {}", descriptor.label(), object.name);

        match descriptor.validate(object, self.timing) {
            Ok(snapshot) => {
                let node = descriptor.emit(snapshot, None);
                match group {
                    Some(index) => self.item_groups[index].objects.push(node),
                    None => self.objects.push(node),
                }
            }
            Err(err) => self.reject(err),
        }
    }

    fn reject(&mut self, err: SchemaViolation) {
        tracing::warn!("skipping object: {err}");
        self.errors.push(err);
    }
}
