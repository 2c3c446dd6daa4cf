//! Domain models for mind map documents.
//!
//! # Core Concepts
//!
//! - [`Node`]: A labeled box on the canvas. Nodes carry no parent pointer; the
//!   tree is always derived from the edge list.
//! - [`Edge`]: A directed `source -> target` link, read as parent -> child.
//! - [`Document`]: One named mind map (nodes + edges), persisted under a document id.
//! - [`StoreRecord`]: The single persisted aggregate mapping document ids to documents.
//! - [`GraphSnapshot`]: A deep copy of `(nodes, edges)` used as a history entry.

mod document;
mod edge;
mod node;
mod snapshot;

pub use document::*;
pub use edge::*;
pub use node::*;
pub use snapshot::*;
