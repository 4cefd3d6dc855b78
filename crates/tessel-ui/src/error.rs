//! Error types for the element engine and its backends.

use crate::tree::NodeId;

/// Errors raised by the element engine.
///
/// None of these are recovered by the engine itself. Contract and invariant
/// checks run before an operation changes anything.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElementError {
    /// A contract declaration was malformed.
    #[error("invalid contract `{contract}`: {reason}")]
    ContractDefinition { contract: String, reason: String },

    /// A candidate crossing the tree boundary lacks a required operation.
    #[error("object does not implement {contract}({operation})")]
    ContractViolation { contract: String, operation: String },

    /// No widget adapter is registered for the requested type tag.
    #[error("unsupported widget type `{0}`")]
    UnsupportedWidgetType(String),

    /// Programmer error: the requested operation can never succeed.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// The node was destroyed and is terminal.
    #[error("{0} has been destroyed")]
    Destroyed(NodeId),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors reported by a [`Backend`](crate::backend::Backend).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The insertion location does not exist in the live document.
    #[error("no element with id `{0}` in the document")]
    UnknownLocation(String),

    /// The markup handed to the backend could not be understood.
    #[error("malformed markup: {0}")]
    Malformed(String),
}

/// Result type for engine operations.
pub type ElementResult<T> = Result<T, ElementError>;
