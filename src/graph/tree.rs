//! Tree structure derived on demand from the edge list.
//!
//! Nothing here is stored; each query walks the current edges. Traversals
//! keep a visited set, so cycles and dangling endpoints are harmless.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Edge, Node};

/// Whether a node has any incoming or outgoing edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connectivity {
    pub has_incoming: bool,
    pub has_outgoing: bool,
}

/// All ids reachable from `parent_id` along `source -> target`, including
/// `parent_id` itself.
pub fn descendants(parent_id: &str, edges: &[Edge]) -> HashSet<String> {
    let adjacency = adjacency(edges);
    let mut visited = HashSet::from([parent_id.to_string()]);
    let mut worklist = vec![parent_id];

    while let Some(current) = worklist.pop() {
        let Some(targets) = adjacency.get(current) else {
            continue;
        };
        for &target in targets {
            if visited.insert(target.to_string()) {
                worklist.push(target);
            }
        }
    }

    visited
}

pub fn connectivity(node_id: &str, edges: &[Edge]) -> Connectivity {
    Connectivity {
        has_incoming: edges.iter().any(|e| e.target == node_id),
        has_outgoing: edges.iter().any(|e| e.source == node_id),
    }
}

/// Ids of nodes that are not hidden.
pub fn visible_set(nodes: &[Node]) -> HashSet<String> {
    nodes
        .iter()
        .filter(|n| !n.hidden)
        .map(|n| n.id.clone())
        .collect()
}

/// Edges whose endpoints are both in `visible`.
pub fn visible_edges<'a>(edges: &'a [Edge], visible: &HashSet<String>) -> Vec<&'a Edge> {
    edges
        .iter()
        .filter(|e| visible.contains(&e.source) && visible.contains(&e.target))
        .collect()
}

/// Nodes without incoming edges, in document order.
pub fn roots<'a>(nodes: &'a [Node], edges: &[Edge]) -> Vec<&'a Node> {
    let targets: HashSet<&str> = edges.iter().map(|e| e.target.as_str()).collect();
    nodes
        .iter()
        .filter(|n| !targets.contains(n.id.as_str()))
        .collect()
}

/// Direct children of `parent_id` that exist in `nodes`, in edge order.
pub fn children_of<'a>(parent_id: &str, nodes: &'a [Node], edges: &[Edge]) -> Vec<&'a Node> {
    let by_id: HashMap<&str, &Node> = nodes.iter().map(|n| (n.id.as_str(), n)).collect();
    edges
        .iter()
        .filter(|e| e.source == parent_id)
        .filter_map(|e| by_id.get(e.target.as_str()).copied())
        .collect()
}

fn adjacency(edges: &[Edge]) -> HashMap<&str, Vec<&str>> {
    let mut map: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        map.entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
    }
    map
}
