//! Error types for diagram operations.
//!
//! Every variant is recoverable: the operation that produced it has refused
//! the mutation and left the diagram untouched.

use thiserror::Error;

use crate::diagram::ShapeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagramError {
    #[error("invalid connection: {reason}")]
    InvalidConnection { reason: &'static str },

    #[error("precondition not met: {0}")]
    PreconditionNotMet(String),

    #[error("shape {0} not found")]
    NotFound(ShapeId),

    #[error("shape {0} is not a basic shape")]
    NotABasicShape(ShapeId),

    #[error("shape {member} cannot be added to group {group}")]
    InvalidMembership { group: ShapeId, member: ShapeId },
}

impl DiagramError {
    pub(crate) fn invalid_connection(reason: &'static str) -> Self {
        Self::InvalidConnection { reason }
    }

    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        Self::PreconditionNotMet(msg.into())
    }
}
