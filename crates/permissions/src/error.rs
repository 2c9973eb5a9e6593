use lms_models::AssignmentStatus;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PermissionError>;

#[derive(Debug, Error)]
pub enum PermissionError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Illegal status transition: {} -> {}", from.as_str(), to.as_str())]
    IllegalTransition {
        from: AssignmentStatus,
        to: AssignmentStatus,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl PermissionError {
    /// True for errors that mean the request itself was bad, as opposed
    /// to the store failing.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            PermissionError::Validation(_) | PermissionError::IllegalTransition { .. }
        )
    }
}
