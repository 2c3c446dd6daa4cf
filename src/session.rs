//! Editing commands over one open document.
//!
//! A session owns the live graph, the undo history and the current
//! selection. Commands run to completion one at a time; every effective
//! change is written back through the [`DocumentStore`].

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditorError, Result};
use crate::graph::{
    connectivity, descendants, place_child, siblings_in_column, visible_edges, visible_set,
    Connectivity, GraphStore,
};
use crate::history::{Clock, HistoryManager, DEFAULT_PUSH_WINDOW};
use crate::models::{Document, Edge, Node, NodePatch};
use crate::store::DocumentStore;

/// Label of a freshly added child.
pub const NEW_NODE_LABEL: &str = "New Node";

/// A visible node together with its connectivity flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewNode {
    #[serde(flatten)]
    pub node: Node,
    pub connectivity: Connectivity,
}

/// What a renderer needs to draw the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorView {
    pub document_id: String,
    pub name: String,
    pub nodes: Vec<ViewNode>,
    pub edges: Vec<Edge>,
    pub selection: Option<String>,
}

pub struct EditorSession {
    document_id: String,
    name: String,
    graph: GraphStore,
    history: HistoryManager,
    selection: Option<String>,
    store: DocumentStore,
}

impl EditorSession {
    /// Open `document_id`, initializing a fresh single-node document if the
    /// store has none.
    pub fn open(store: DocumentStore, document_id: &str, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::open_with_window(store, document_id, clock, DEFAULT_PUSH_WINDOW)
    }

    pub fn open_with_window(
        store: DocumentStore,
        document_id: &str,
        clock: Arc<dyn Clock>,
        window: Duration,
    ) -> Result<Self> {
        let document = match store.load(document_id)? {
            Some(document) => document,
            None => {
                tracing::warn!("Document {} not found, initializing a fresh one", document_id);
                let document = Document::default();
                store.save(document_id, &document.nodes, &document.edges)?;
                document
            }
        };

        let graph = GraphStore::new(document.nodes, document.edges);
        let mut history = HistoryManager::with_window(clock, window);
        history.reset(graph.snapshot());

        tracing::debug!("Opened document {} ({})", document_id, document.name);
        Ok(Self {
            document_id: document_id.to_string(),
            name: document.name,
            graph,
            history,
            selection: None,
            store,
        })
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update the cached name after the catalog renamed the document.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn document(&self) -> Document {
        Document {
            name: self.name.clone(),
            nodes: self.graph.nodes().to_vec(),
            edges: self.graph.edges().to_vec(),
        }
    }

    /// Set or clear the selection.
    pub fn select_node(&mut self, node_id: Option<&str>) -> Result<()> {
        match node_id {
            Some(id) if self.graph.node(id).is_none() => {
                Err(EditorError::NodeNotFound(id.to_string()))
            }
            Some(id) => {
                self.selection = Some(id.to_string());
                Ok(())
            }
            None => {
                self.selection = None;
                Ok(())
            }
        }
    }

    /// Add a child below the selected node and return it.
    pub fn add_child(&mut self) -> Result<Node> {
        let parent = self.selected_node()?.clone();

        self.history.push(self.graph.snapshot());

        let siblings = siblings_in_column(&parent, self.graph.nodes());
        let child = Node::new(
            Uuid::new_v4().to_string(),
            NEW_NODE_LABEL,
            place_child(&parent, siblings),
        );
        self.graph.add_node(child.clone());
        self.graph.add_edge(Edge::new(
            Uuid::new_v4().to_string(),
            parent.id.as_str(),
            child.id.as_str(),
        ));

        self.history.checkpoint(self.graph.snapshot());
        tracing::debug!("Added node {} under {}", child.id, parent.id);
        self.autosave();
        Ok(child)
    }

    /// Remove the selected node and everything below it. Returns the removed ids.
    pub fn delete_subtree(&mut self) -> Result<HashSet<String>> {
        let selected = self.selected_node()?.id.clone();

        self.history.push(self.graph.snapshot());

        let removed = descendants(&selected, self.graph.edges());
        self.graph.remove_nodes(&removed);
        self.graph.remove_edges(|e| e.touches_any(&removed));
        self.selection = None;

        tracing::debug!("Deleted subtree of {} ({} ids)", selected, removed.len());
        self.autosave();
        Ok(removed)
    }

    /// Commit a new label, then record history.
    pub fn rename_node(&mut self, node_id: &str, label: &str) -> Result<()> {
        if !self.graph.update_node(node_id, NodePatch::label(label)) {
            return Err(EditorError::NodeNotFound(node_id.to_string()));
        }
        self.history.push(self.graph.snapshot());
        tracing::debug!("Renamed node {}", node_id);
        self.autosave();
        Ok(())
    }

    /// Record history, then apply the new color.
    pub fn recolor(&mut self, node_id: &str, color: &str) -> Result<()> {
        if self.graph.node(node_id).is_none() {
            return Err(EditorError::NodeNotFound(node_id.to_string()));
        }
        self.history.push(self.graph.snapshot());
        self.graph.update_node(node_id, NodePatch::color(color));
        tracing::debug!("Recolored node {} to {}", node_id, color);
        self.autosave();
        Ok(())
    }

    /// Hide or show everything below `node_id`.
    ///
    /// The new state is the negation of the first descendant's current
    /// state, applied to the whole subtree. Returns `None` for a node
    /// without descendants.
    pub fn toggle_collapse(&mut self, node_id: &str) -> Result<Option<bool>> {
        if self.graph.node(node_id).is_none() {
            return Err(EditorError::NodeNotFound(node_id.to_string()));
        }

        let mut subtree = descendants(node_id, self.graph.edges());
        subtree.remove(node_id);

        let targets: Vec<&Node> = self
            .graph
            .nodes()
            .iter()
            .filter(|n| subtree.contains(&n.id))
            .collect();
        let Some(representative) = targets.first() else {
            return Ok(None);
        };
        let hide = !representative.hidden;
        let ids: Vec<String> = targets.iter().map(|n| n.id.clone()).collect();

        for id in &ids {
            self.graph.update_node(id, NodePatch::hidden(hide));
        }

        tracing::debug!(
            "{} {} nodes below {}",
            if hide { "Collapsed" } else { "Expanded" },
            ids.len(),
            node_id
        );
        self.autosave();
        Ok(Some(hide))
    }

    /// Step back one history entry. Returns false when there is nothing to undo.
    ///
    /// History keeps duplicate entries (a snapshot-before push equals the
    /// entry under it), so a step can restore a state identical to the
    /// current one. That still consumes the entry and returns true, but
    /// nothing is saved.
    pub fn undo(&mut self) -> bool {
        let before = self.graph.snapshot();
        if !self.history.undo(&mut self.graph) {
            return false;
        }
        if self.graph.snapshot() == before {
            tracing::debug!("Undo restored an identical state");
            return true;
        }
        let stale = self
            .selection
            .as_deref()
            .is_some_and(|id| self.graph.node(id).is_none());
        if stale {
            self.selection = None;
        }
        self.autosave();
        true
    }

    /// Visible nodes and edges, with connectivity flags.
    pub fn view(&self) -> EditorView {
        let visible = visible_set(self.graph.nodes());
        let edges = self.graph.edges();
        EditorView {
            document_id: self.document_id.clone(),
            name: self.name.clone(),
            nodes: self
                .graph
                .nodes()
                .iter()
                .filter(|n| visible.contains(&n.id))
                .map(|n| ViewNode {
                    node: n.clone(),
                    connectivity: connectivity(&n.id, edges),
                })
                .collect(),
            edges: visible_edges(edges, &visible).into_iter().cloned().collect(),
            selection: self.selection.clone(),
        }
    }

    fn selected_node(&self) -> Result<&Node> {
        self.selection
            .as_deref()
            .and_then(|id| self.graph.node(id))
            .ok_or(EditorError::NoSelection)
    }

    fn autosave(&self) {
        if let Err(e) = self
            .store
            .save(&self.document_id, self.graph.nodes(), self.graph.edges())
        {
            tracing::error!("Autosave of document {} failed: {:#}", self.document_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::history::ManualClock;

    fn open() -> (Arc<ManualClock>, EditorSession) {
        let db = Database::open_memory().unwrap();
        db.migrate().unwrap();
        let clock = Arc::new(ManualClock::new());
        let session = EditorSession::open(DocumentStore::new(db), "doc", clock.clone()).unwrap();
        (clock, session)
    }

    #[test]
    fn test_missing_document_opens_fresh() {
        let (_clock, session) = open();
        assert_eq!(session.name(), "Untitled Map");
        assert_eq!(session.graph().nodes().len(), 1);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_commands_without_selection_change_nothing() {
        let (_clock, mut session) = open();
        let before = session.graph().snapshot();
        assert!(matches!(session.add_child(), Err(EditorError::NoSelection)));
        assert!(matches!(session.delete_subtree(), Err(EditorError::NoSelection)));
        assert_eq!(session.graph().snapshot(), before);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_selecting_unknown_node_fails() {
        let (_clock, mut session) = open();
        assert!(matches!(
            session.select_node(Some("nope")),
            Err(EditorError::NodeNotFound(_))
        ));
        assert!(session.selection().is_none());
    }

    #[test]
    fn test_view_hides_collapsed_subtree() {
        let (_clock, mut session) = open();
        session.select_node(Some("1")).unwrap();
        let child = session.add_child().unwrap();
        session.toggle_collapse("1").unwrap();

        let view = session.view();
        assert_eq!(view.nodes.len(), 1);
        assert!(view.edges.is_empty());
        assert!(view.nodes[0].connectivity.has_outgoing);
        assert!(session.graph().node(&child.id).unwrap().hidden);
    }

    #[test]
    fn test_undo_clears_stale_selection() {
        let (_clock, mut session) = open();
        session.select_node(Some("1")).unwrap();
        let child = session.add_child().unwrap();
        session.select_node(Some(&child.id)).unwrap();
        assert!(session.undo());
        assert!(session.selection().is_none());
    }
}
