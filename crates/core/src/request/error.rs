//! Request draft error types.

use thiserror::Error;

/// Errors raised while normalizing a request form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    /// No client was selected.
    #[error("A client is required")]
    ClientRequired,

    /// Unknown status value.
    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    /// Unknown priority value.
    #[error("Invalid priority: {0}")]
    InvalidPriority(String),

    /// A product line points at no inventory item.
    #[error("Invalid inventory item id: {0}")]
    InvalidInventoryItem(i32),

    /// A team id is not a positive integer.
    #[error("Invalid team id: {0}")]
    InvalidTeam(i32),
}

impl DraftError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        400
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_draft_errors_are_bad_requests() {
        let errors = [
            DraftError::ClientRequired,
            DraftError::InvalidStatus("x".into()),
            DraftError::InvalidPriority("x".into()),
            DraftError::InvalidInventoryItem(0),
            DraftError::InvalidTeam(-1),
        ];
        for err in errors {
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_draft_error_display() {
        assert_eq!(DraftError::ClientRequired.to_string(), "A client is required");
        assert_eq!(
            DraftError::InvalidStatus("archived".into()).to_string(),
            "Invalid status: archived"
        );
        assert_eq!(DraftError::InvalidTeam(0).to_string(), "Invalid team id: 0");
    }
}
