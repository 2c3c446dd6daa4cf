use std::collections::HashSet;

use crate::models::{Edge, GraphSnapshot, Node, NodePatch};

/// Owns the nodes and edges of the active document.
///
/// Every operation is total: unknown ids are ignored and nothing checks
/// whether the graph stays acyclic.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl GraphStore {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Append a node. Returns false (and changes nothing) if the id is taken.
    pub fn add_node(&mut self, node: Node) -> bool {
        if self.node(&node.id).is_some() {
            tracing::warn!("Ignoring duplicate node id {}", node.id);
            return false;
        }
        self.nodes.push(node);
        true
    }

    /// Remove every node whose id is in `ids`. Returns how many were removed.
    pub fn remove_nodes(&mut self, ids: &HashSet<String>) -> usize {
        let before = self.nodes.len();
        self.nodes.retain(|n| !ids.contains(&n.id));
        before - self.nodes.len()
    }

    /// Append an edge. Returns false (and changes nothing) if the id is taken.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if self.edges.iter().any(|e| e.id == edge.id) {
            tracing::warn!("Ignoring duplicate edge id {}", edge.id);
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Remove every edge matching `predicate`. Returns how many were removed.
    pub fn remove_edges<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&Edge) -> bool,
    {
        let before = self.edges.len();
        self.edges.retain(|e| !predicate(e));
        before - self.edges.len()
    }

    /// Patch a node in place. Returns false if no node has this id.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) -> bool {
        match self.nodes.iter_mut().find(|n| n.id == id) {
            Some(node) => {
                node.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        GraphSnapshot::new(self.nodes.clone(), self.edges.clone())
    }

    pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
    }

    pub fn restore(&mut self, snapshot: &GraphSnapshot) {
        self.replace(snapshot.nodes.clone(), snapshot.edges.clone());
    }
}
