use serde::{Deserialize, Serialize};

/// Order in which sibling objects are visited.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ObjectOrdering {
    /// Whatever order the host reports children in.
    #[default]
    HostOrder,
    /// Siblings sorted by name (stable for equal names).
    ByName,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    /// Stage name. Falls back to the root object's name when empty.
    pub stage_name: String,
    pub ordering: ObjectOrdering,
    pub fallout_plane_y: f64,
    pub model_imports: Vec<String>,
    pub bake_animation: bool,
    pub pretty: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            stage_name: String::new(),
            ordering: ObjectOrdering::HostOrder,
            fallout_plane_y: 0.0,
            model_imports: Vec::new(),
            bake_animation: true,
            pretty: true,
        }
    }
}
