use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::activities::ActivityError;
use crate::goals::GoalError;
use crate::progression::ProgressionError;
use crate::roulette::RouletteError;
use crate::users::UserError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the progression engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Goal error: {0}")]
    Goal(#[from] GoalError),

    #[error("Progression error: {0}")]
    Progression(#[from] ProgressionError),

    #[error("User error: {0}")]
    User(#[from] UserError),

    #[error("Activity error: {0}")]
    Activity(#[from] ActivityError),

    #[error("Roulette error: {0}")]
    Roulette(#[from] RouletteError),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),
}

// A lock wait that exhausts busy_timeout surfaces as a "database is locked"
// error; callers may retry those, so they get their own variant.
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(kind, info) => {
                if info.message().contains("database is locked") {
                    Error::Progression(ProgressionError::ConcurrencyTimeout)
                } else {
                    Error::Database(DatabaseError::QueryFailed(DieselError::DatabaseError(
                        kind, info,
                    )))
                }
            }
            other => Error::Database(DatabaseError::QueryFailed(other)),
        }
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(e))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
