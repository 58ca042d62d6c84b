//! Repository Module
//!
//! Plain SQL access per table. Functions that take a transaction are meant
//! to be composed by the domain layer into one atomic unit.

pub mod dining_table;
pub mod menu_item;
pub mod order;
pub mod report;
pub mod reservation;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound("row not found".into()),
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                RepoError::Duplicate(db_err.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Transaction handle shared by the tx-aware repository functions
pub type Tx<'c> = sqlx::Transaction<'c, sqlx::Sqlite>;
