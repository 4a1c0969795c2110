//! SeaORM-backed credential store.

use async_trait::async_trait;
use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QuerySelect, Set, SqlErr,
};
use tracing::debug;

use super::entities::app::{self, Entity as AppEntity};
use super::entities::user::{self, Entity as UserEntity};
use super::{Storage, StorageError, StorageResult};
use domain::{App, NewUser, User};

/// Credential store over a relational database.
pub struct SqlStore {
    db: DatabaseConnection,
}

impl SqlStore {
    /// Create new store instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Provision an application.
    ///
    /// Apps are not created by the credential service itself; this backs the
    /// operator CLI. Without an explicit `id` the database assigns one.
    pub async fn create_app(
        &self,
        id: Option<i32>,
        name: String,
        secret: String,
    ) -> StorageResult<App> {
        let active_model = app::ActiveModel {
            id: id.map(Set).unwrap_or(NotSet),
            name: Set(name.clone()),
            secret: Set(secret.clone()),
        };

        let result = AppEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| classify(e, StorageError::AppExists))?;

        debug!(app_id = result.last_insert_id, "app created");
        Ok(App {
            id: result.last_insert_id,
            name,
            secret,
        })
    }
}

#[async_trait]
impl Storage for SqlStore {
    async fn save_user(&self, user: NewUser) -> StorageResult<i64> {
        let active_model = user::ActiveModel {
            id: NotSet,
            name: Set(user.name),
            email: Set(user.email),
            password_hash: Set(user.password_hash.into_bytes()),
            is_admin: Set(user.is_admin),
        };

        let result = UserEntity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| classify(e, StorageError::UserExists))?;

        Ok(result.last_insert_id)
    }

    async fn find_user_by_email(&self, email: &str) -> StorageResult<User> {
        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?
            .map(User::from)
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> StorageResult<bool> {
        UserEntity::find_by_id(user_id)
            .select_only()
            .column(user::Column::IsAdmin)
            .into_tuple::<bool>()
            .one(&self.db)
            .await?
            .ok_or(StorageError::UserNotFound)
    }

    async fn find_app(&self, app_id: i32) -> StorageResult<App> {
        AppEntity::find_by_id(app_id)
            .one(&self.db)
            .await?
            .map(App::from)
            .ok_or(StorageError::AppNotFound)
    }
}

/// Map a unique-constraint violation to `conflict`, anything else to a
/// database error.
fn classify(err: DbErr, conflict: StorageError) -> StorageError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => conflict,
        _ => StorageError::Database(err),
    }
}
