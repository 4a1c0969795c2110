//! Storage provider errors.

use sea_orm::DbErr;
use thiserror::Error;

/// Failure kinds reported by a storage provider.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("user already exists")]
    UserExists,

    #[error("user not found")]
    UserNotFound,

    #[error("app already exists")]
    AppExists,

    #[error("app not found")]
    AppNotFound,

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
