use anyhow::Result;

use crate::db::Database;
use crate::models::{Document, Edge, Node, DEFAULT_DOCUMENT_NAME};

use super::{read_record, write_record};

/// Loads and saves the graph of a single document.
#[derive(Clone)]
pub struct DocumentStore {
    db: Database,
}

impl DocumentStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn load(&self, document_id: &str) -> Result<Option<Document>> {
        let mut record = read_record(&self.db)?;
        Ok(record.remove(document_id))
    }

    /// Overwrite the nodes and edges of `document_id`, keeping its name.
    ///
    /// Creates a default-named document if none exists. Last write wins.
    pub fn save(&self, document_id: &str, nodes: &[Node], edges: &[Edge]) -> Result<()> {
        let mut record = read_record(&self.db)?;
        let document = record
            .entry(document_id.to_string())
            .or_insert_with(|| Document {
                name: DEFAULT_DOCUMENT_NAME.to_string(),
                nodes: Vec::new(),
                edges: Vec::new(),
            });
        document.nodes = nodes.to_vec();
        document.edges = edges.to_vec();
        write_record(&self.db, &record)?;
        tracing::debug!(
            "Saved document {} ({} nodes, {} edges)",
            document_id,
            nodes.len(),
            edges.len()
        );
        Ok(())
    }
}
