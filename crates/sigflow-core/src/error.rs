//! Error types for sigflow-core

use crate::{BusId, Identifier, PortId, ProcessId, SignalId, SlotKind};
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Generic entity {0} cannot be instantiated without input signals")]
    GenericEntityNotInstantiable(Identifier),

    #[error("Entity {entity} declares {expected} {kind} slots, got {got}")]
    EntitySignalMismatch {
        entity: Identifier,
        kind: SlotKind,
        expected: usize,
        got: usize,
    },

    #[error("Invalid argument: {0}")]
    ArgumentInvalid(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    #[error("Signal not found: {0}")]
    SignalNotFound(SignalId),

    #[error("Bus not found: {0}")]
    BusNotFound(BusId),

    #[error("Port not found: {0}")]
    PortNotFound(PortId),

    #[error("Process not found: {0}")]
    ProcessNotFound(ProcessId),

    #[error("Port {0} has no linked architecture")]
    ArchitectureNotLinked(PortId),

    #[error("Network did not settle within {0} delta cycles")]
    DeltaCycleLimitExceeded(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Shorthand for an `ArgumentInvalid` error
    pub fn invalid(message: impl Into<String>) -> Self {
        Error::ArgumentInvalid(message.into())
    }

    /// Shorthand for an `UnsupportedOperation` error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedOperation(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
