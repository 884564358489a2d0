//! Delivery assignment transition errors.

use thiserror::Error;

use crate::assignment::types::AssignmentStatus;

/// Errors raised by assignment transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentTransitionError {
    /// The assignment cannot move from its current status.
    #[error("Invalid assignment transition from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: AssignmentStatus,
        /// Attempted status.
        to: AssignmentStatus,
    },

    /// Unknown status value.
    #[error("Invalid assignment status: {0}")]
    InvalidStatus(String),
}

impl AssignmentTransitionError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidTransition { .. } => 422,
            Self::InvalidStatus(_) => 400,
        }
    }
}
