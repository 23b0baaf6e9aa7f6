use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for goal, small-goal and task operations
#[derive(Debug, Error)]
pub enum GoalError {
    #[error("Not found: {0}")]
    NotFound(String),
    /// Re-completion of something already terminal. Safe for callers to
    /// treat as idempotent; nothing was posted twice.
    #[error("{0} is already completed")]
    AlreadyCompleted(String),
    /// The common "not done yet" user outcome, not a system fault.
    #[error("{pending} sub-unit(s) still pending")]
    IncompleteSubunits { pending: usize },
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for GoalError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => GoalError::NotFound("Record not found".to_string()),
            _ => GoalError::DatabaseError(err.to_string()),
        }
    }
}
