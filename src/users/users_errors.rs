use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for user-related operations
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for UserError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => UserError::NotFound("Record not found".to_string()),
            _ => UserError::DatabaseError(err.to_string()),
        }
    }
}
