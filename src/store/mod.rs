//! Persistence of mind map documents.
//!
//! Every document lives inside one [`StoreRecord`] serialized as JSON under a
//! single key of the [`Database`]. A missing or unreadable record reads as an
//! empty mapping; writes always replace the whole record.

mod catalog;
mod documents;

pub use catalog::MapCatalog;
pub use documents::DocumentStore;

use anyhow::{Context, Result};

use crate::db::Database;
use crate::models::StoreRecord;

/// Key holding the serialized [`StoreRecord`].
pub const STORE_KEY: &str = "mindmaps";

pub(crate) fn read_record(db: &Database) -> Result<StoreRecord> {
    let Some(raw) = db.get_value(STORE_KEY)? else {
        return Ok(StoreRecord::new());
    };
    Ok(parse_record(&raw))
}

pub(crate) fn write_record(db: &Database, record: &StoreRecord) -> Result<()> {
    let raw = serde_json::to_string(record).context("Failed to serialize map store")?;
    db.put_value(STORE_KEY, &raw)
}

/// Parse a stored record, treating corrupt data as empty.
pub(crate) fn parse_record(raw: &str) -> StoreRecord {
    match serde_json::from_str(raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::warn!("Stored map record is unreadable, treating as empty: {}", e);
            StoreRecord::new()
        }
    }
}
