use serde::{Deserialize, Serialize};

use super::{Edge, Node};

/// A deep copy of a document's graph at one point in time.
///
/// Snapshots own their data, so later edits to the live graph never leak
/// into history entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphSnapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }
}
