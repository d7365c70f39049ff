//! Error types for sigflow-export

use thiserror::Error;

/// Export error type
#[derive(Debug, Error)]
pub enum Error {
    /// Error raised by the engine while restoring
    #[error(transparent)]
    Core(#[from] sigflow_core::Error),

    /// A port record refers to a node missing from the snapshot
    #[error("Unknown {kind} guid: {guid}")]
    UnknownGuid { kind: &'static str, guid: u64 },

    /// Export error
    #[error("Export error: {0}")]
    ExportError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, Error>;
