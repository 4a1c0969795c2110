//! Credential store contract and its providers.
//!
//! The core only ever talks to [`Storage`]; which provider backs it is
//! decided at bootstrap.

pub mod entities;
mod error;
mod memory_store;
mod sql_store;

use async_trait::async_trait;

use domain::{App, NewUser, User};

pub use error::{StorageError, StorageResult};
pub use memory_store::MemoryStore;
pub use sql_store::SqlStore;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Storage capabilities needed by the credential service.
///
/// Email uniqueness is enforced here, not by callers: concurrent
/// `save_user` calls for one email must yield exactly one success.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist a new user and return its assigned ID.
    ///
    /// Fails with [`StorageError::UserExists`] if the email is taken.
    async fn save_user(&self, user: NewUser) -> StorageResult<i64>;

    /// Find a user by email.
    ///
    /// Fails with [`StorageError::UserNotFound`] if no user has the email.
    async fn find_user_by_email(&self, email: &str) -> StorageResult<User>;

    /// Read the admin flag of a user.
    ///
    /// Fails with [`StorageError::UserNotFound`] if the ID is unknown.
    async fn is_admin(&self, user_id: i64) -> StorageResult<bool>;

    /// Find an application by ID.
    ///
    /// Fails with [`StorageError::AppNotFound`] if the ID is unknown.
    async fn find_app(&self, app_id: i32) -> StorageResult<App>;
}
