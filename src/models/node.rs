use serde::{Deserialize, Serialize};

/// Color given to nodes that were never recolored.
pub const DEFAULT_COLOR: &str = "#333";

/// A point on the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A labeled node of a mind map.
///
/// Node ids are unique within their document. Connectivity is never stored
/// here: parent/child relations come from the document's edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub position: Position,
    pub label: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Set when an ancestor's subtree is collapsed.
    #[serde(default)]
    pub hidden: bool,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            position,
            label: label.into(),
            color: DEFAULT_COLOR.to_string(),
            hidden: false,
        }
    }

    /// Apply the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: NodePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(hidden) = patch.hidden {
            self.hidden = hidden;
        }
    }
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

/// Partial update for a node. All fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodePatch {
    pub position: Option<Position>,
    pub label: Option<String>,
    pub color: Option<String>,
    pub hidden: Option<bool>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    pub fn hidden(hidden: bool) -> Self {
        Self {
            hidden: Some(hidden),
            ..Self::default()
        }
    }
}
