use thiserror::Error;

/// Errors surfaced by editor commands and catalog operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// A command that needs a selected node ran without one.
    #[error("Select a node first")]
    NoSelection,

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
