//! In-process credential store.
//!
//! Same contract as [`super::SqlStore`]: user IDs are assigned sequentially
//! from 1 and emails are unique. Contents are lost when the process exits.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Storage, StorageError, StorageResult};
use domain::{App, NewUser, User};

#[derive(Default)]
struct Tables {
    /// Users in ID order; a user's ID is its index + 1
    users: Vec<User>,
    user_ids_by_email: HashMap<String, i64>,
    apps: HashMap<i32, App>,
}

/// Credential store kept in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given applications provisioned
    pub fn with_apps(apps: impl IntoIterator<Item = App>) -> Self {
        let tables = Tables {
            apps: apps.into_iter().map(|app| (app.id, app)).collect(),
            ..Tables::default()
        };

        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Provision an application, failing if its ID or name is taken
    pub async fn add_app(&self, app: App) -> StorageResult<()> {
        let mut tables = self.tables.write().await;
        if tables.apps.contains_key(&app.id) || tables.apps.values().any(|a| a.name == app.name) {
            return Err(StorageError::AppExists);
        }

        tables.apps.insert(app.id, app);
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStore {
    async fn save_user(&self, user: NewUser) -> StorageResult<i64> {
        let mut tables = self.tables.write().await;
        if tables.user_ids_by_email.contains_key(&user.email) {
            return Err(StorageError::UserExists);
        }

        let id = tables.users.len() as i64 + 1;
        tables.user_ids_by_email.insert(user.email.clone(), id);
        tables.users.push(User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
        });

        Ok(id)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User> {
        let tables = self.tables.read().await;
        tables
            .user_ids_by_email
            .get(email)
            .and_then(|id| tables.users.get((*id - 1) as usize))
            .cloned()
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> StorageResult<bool> {
        if user_id < 1 {
            return Err(StorageError::UserNotFound);
        }

        self.tables
            .read()
            .await
            .users
            .get((user_id - 1) as usize)
            .map(|user| user.is_admin)
            .ok_or(StorageError::UserNotFound)
    }

    async fn find_app(&self, app_id: i32) -> StorageResult<App> {
        self.tables
            .read()
            .await
            .apps
            .get(&app_id)
            .cloned()
            .ok_or(StorageError::AppNotFound)
    }
}
