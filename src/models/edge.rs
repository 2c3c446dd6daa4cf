use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A directed link between two nodes, read as `source` (parent) -> `target` (child).
///
/// Endpoints are expected to name existing nodes but nothing guarantees it;
/// readers filter dangling references instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    /// True when either endpoint is in `ids`.
    pub fn touches_any(&self, ids: &HashSet<String>) -> bool {
        ids.contains(&self.source) || ids.contains(&self.target)
    }
}
