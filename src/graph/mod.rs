//! The live node/edge graph of the active document, plus the pure functions
//! that derive tree structure and child placement from it.

mod layout;
mod store;
pub mod tree;

pub use layout::{place_child, siblings_in_column, COLUMN_OFFSET, ROW_OFFSET};
pub use store::GraphStore;
pub use tree::{Connectivity, connectivity, descendants, visible_edges, visible_set};
