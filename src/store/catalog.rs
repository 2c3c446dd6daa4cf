use std::collections::BTreeMap;

use anyhow::{Context, Result};
use uuid::Uuid;

use crate::db::Database;
use crate::models::{Document, DocumentSummary, StoreRecord};

use super::{read_record, write_record};

/// Directory of every stored document.
///
/// Deletion is unconditional here; asking the user for confirmation is the
/// caller's job.
#[derive(Clone)]
pub struct MapCatalog {
    db: Database,
}

impl MapCatalog {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn list(&self) -> Result<BTreeMap<String, DocumentSummary>> {
        let record = read_record(&self.db)?;
        Ok(record
            .iter()
            .map(|(id, doc)| (id.clone(), doc.summary()))
            .collect())
    }

    pub fn get(&self, document_id: &str) -> Result<Option<Document>> {
        let mut record = read_record(&self.db)?;
        Ok(record.remove(document_id))
    }

    pub fn contains(&self, document_id: &str) -> Result<bool> {
        Ok(read_record(&self.db)?.contains_key(document_id))
    }

    /// Store `initial` under a freshly generated id and return the id.
    pub fn create(&self, initial: Document) -> Result<String> {
        let mut record = read_record(&self.db)?;
        let id = loop {
            let candidate = Uuid::new_v4().to_string();
            if !record.contains_key(&candidate) {
                break candidate;
            }
        };
        tracing::info!("Creating document {} ({})", id, initial.name);
        record.insert(id.clone(), initial);
        write_record(&self.db, &record)?;
        Ok(id)
    }

    /// Returns false if the document does not exist.
    pub fn rename(&self, document_id: &str, new_name: &str) -> Result<bool> {
        let mut record = read_record(&self.db)?;
        let Some(document) = record.get_mut(document_id) else {
            return Ok(false);
        };
        document.name = new_name.to_string();
        write_record(&self.db, &record)?;
        tracing::info!("Renamed document {} to {}", document_id, new_name);
        Ok(true)
    }

    /// Returns false if the document does not exist.
    pub fn delete(&self, document_id: &str) -> Result<bool> {
        let mut record = read_record(&self.db)?;
        if record.remove(document_id).is_none() {
            return Ok(false);
        }
        write_record(&self.db, &record)?;
        tracing::info!("Deleted document {}", document_id);
        Ok(true)
    }

    /// The full store record as pretty JSON.
    pub fn export(&self) -> Result<String> {
        let record = read_record(&self.db)?;
        serde_json::to_string_pretty(&record).context("Failed to serialize map store")
    }

    /// Replace the whole store with the record in `json`.
    ///
    /// Fails on unparseable input rather than reading it as empty.
    pub fn import(&self, json: &str) -> Result<usize> {
        let record: StoreRecord =
            serde_json::from_str(json).context("Import file is not a valid map store")?;
        write_record(&self.db, &record)?;
        tracing::info!("Imported {} documents", record.len());
        Ok(record.len())
    }
}
