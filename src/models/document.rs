use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Edge, Node, Position};

/// Name given to documents created without one.
pub const DEFAULT_DOCUMENT_NAME: &str = "Untitled Map";

/// Id of the root node of a freshly initialized document.
pub const ROOT_NODE_ID: &str = "1";

/// One mind map: a name plus its ordered nodes and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Document {
    /// A document holding a single root node and no edges.
    pub fn fresh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: vec![Node::new(ROOT_NODE_ID, "Root", Position::new(100.0, 100.0))],
            edges: Vec::new(),
        }
    }

    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            name: self.name.clone(),
            node_count: self.nodes.len(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::fresh(DEFAULT_DOCUMENT_NAME)
    }
}

/// Catalog entry shown in the document list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub node_count: usize,
}

/// The persisted aggregate: document id -> document.
///
/// A `BTreeMap` keeps serialization order stable, so rewriting an unchanged
/// record produces identical bytes.
pub type StoreRecord = BTreeMap<String, Document>;

/// Input for creating a new document through the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateDocumentInput {
    /// Defaults to [`DEFAULT_DOCUMENT_NAME`].
    pub name: Option<String>,
}

/// Input for renaming a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameDocumentInput {
    pub name: String,
}

/// A document id together with its catalog summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentListing {
    pub id: String,
    #[serde(flatten)]
    pub summary: DocumentSummary,
}
