//! Mind map documents: a node/edge graph with derived tree semantics,
//! bounded undo history and multi-document persistence.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod history;
pub mod models;
pub mod render;
pub mod session;
pub mod store;
