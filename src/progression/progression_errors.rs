use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for progression ledger operations
#[derive(Debug, Error)]
pub enum ProgressionError {
    #[error("Not enough tickets")]
    InsufficientTickets,
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),
    #[error("Could not acquire the progression lock in time; retry the request")]
    ConcurrencyTimeout,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<DieselError> for ProgressionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => ProgressionError::NotFound("Record not found".to_string()),
            _ => ProgressionError::DatabaseError(err.to_string()),
        }
    }
}
