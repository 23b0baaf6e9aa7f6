use diesel::result::Error as DieselError;
use thiserror::Error;

/// Custom error type for roulette slot operations
#[derive(Debug, Error)]
pub enum RouletteError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<DieselError> for RouletteError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RouletteError::NotFound("Record not found".to_string()),
            _ => RouletteError::DatabaseError(err.to_string()),
        }
    }
}
