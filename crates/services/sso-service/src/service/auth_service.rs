//! Credential service - Registers users, signs them in to applications and
//! answers admin queries.
//!
//! Stateless: every call is a function of its inputs and the store's
//! current contents. Uniqueness and concurrency are the store's job.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use tracing::{error, info, warn};

use crate::storage::{Storage, StorageError};
use crate::token;
use common::{AppError, AppResult, TokenConfig};
use domain::{NewUser, Password, User};

/// Hash checked when the email is unknown, so that a miss costs the same
/// as a wrong password. Built when the first `Authenticator` is created.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| match Password::hash("dummy-password-for-unknown-users") {
        Ok(hash) => Some(hash),
        Err(e) => {
            error!(error = %e, "failed to build dummy password hash");
            None
        }
    });

/// Credential service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and return its ID
    async fn sign_up(
        &self,
        name: String,
        email: String,
        password: String,
        is_admin: bool,
    ) -> AppResult<i64>;

    /// Authenticate a user and return a token scoped to `app_id`
    async fn sign_in(&self, email: String, password: String, app_id: i32) -> AppResult<String>;

    /// Whether the user has admin privileges
    async fn is_admin(&self, user_id: i64) -> AppResult<bool>;
}

/// Concrete implementation of AuthService over a credential store.
pub struct Authenticator {
    storage: Arc<dyn Storage>,
    token_ttl: Duration,
}

impl Authenticator {
    /// Create new credential service instance
    pub fn new(storage: Arc<dyn Storage>, config: TokenConfig) -> Self {
        Lazy::force(&DUMMY_PASSWORD);

        Self {
            storage,
            token_ttl: config.ttl(),
        }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn sign_up(
        &self,
        name: String,
        email: String,
        password: String,
        is_admin: bool,
    ) -> AppResult<i64> {
        const OP: &str = "auth.sign_up";
        info!(op = OP, "registering user");

        let password_hash = hash_password(OP, password).await.map_err(|e| {
            error!(op = OP, "failed to generate password hash");
            e
        })?;

        let user = NewUser {
            name,
            email,
            password_hash,
            is_admin,
        };

        match self.storage.save_user(user).await {
            Ok(user_id) => {
                info!(op = OP, user_id, "user registered");
                Ok(user_id)
            }
            Err(StorageError::UserExists) => {
                warn!(op = OP, "user already exists");
                Err(AppError::UserAlreadyExists)
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to save user");
                Err(AppError::internal(OP, e))
            }
        }
    }

    async fn sign_in(&self, email: String, password: String, app_id: i32) -> AppResult<String> {
        const OP: &str = "auth.sign_in";
        info!(op = OP, app_id, "signing in user");

        let user = match self.storage.find_user_by_email(&email).await {
            Ok(user) => user,
            Err(StorageError::UserNotFound) => {
                warn!(op = OP, "user not found");
                let _ = verify_dummy(OP, password).await;
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to get user");
                return Err(AppError::internal(OP, e));
            }
        };

        let (user, verified) = verify_credentials(OP, user, password).await?;
        if !verified {
            info!(op = OP, user_id = user.id, "invalid credentials");
            return Err(AppError::InvalidCredentials);
        }

        // Apps are resolved only for verified credentials.
        let app = match self.storage.find_app(app_id).await {
            Ok(app) => app,
            Err(StorageError::AppNotFound) => {
                warn!(op = OP, app_id, "app not found");
                return Err(AppError::InvalidAppId);
            }
            Err(e) => {
                error!(op = OP, error = %e, "failed to get app");
                return Err(AppError::internal(OP, e));
            }
        };

        let token = token::issue(&user, &app, self.token_ttl).map_err(|e| {
            error!(op = OP, "failed to generate token");
            e
        })?;

        info!(op = OP, user_id = user.id, app_id, "user signed in");
        Ok(token)
    }

    async fn is_admin(&self, user_id: i64) -> AppResult<bool> {
        const OP: &str = "auth.is_admin";
        info!(op = OP, user_id, "checking if user is admin");

        match self.storage.is_admin(user_id).await {
            Ok(is_admin) => {
                info!(op = OP, user_id, is_admin, "checked if user is admin");
                Ok(is_admin)
            }
            Err(StorageError::UserNotFound) => {
                warn!(op = OP, user_id, "user not found");
                Err(AppError::UserNotFound)
            }
            Err(e) => {
                error!(op = OP, user_id, error = %e, "failed to check admin flag");
                Err(AppError::internal(OP, e))
            }
        }
    }
}

/// Hash on the blocking pool.
async fn hash_password(op: &'static str, password: String) -> AppResult<Password> {
    tokio::task::spawn_blocking(move || Password::hash(&password))
        .await
        .map_err(|e| AppError::internal(op, e))?
        .map_err(AppError::from)
}

async fn verify_credentials(
    op: &'static str,
    user: User,
    password: String,
) -> AppResult<(User, bool)> {
    tokio::task::spawn_blocking(move || {
        let verified = user.verify_password(&password);
        (user, verified)
    })
    .await
    .map_err(|e| AppError::internal(op, e))
}

/// Spend one Argon2 run on `password` without a real user behind it.
async fn verify_dummy(op: &'static str, password: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || match DUMMY_PASSWORD.as_ref() {
        Some(hash) => hash.verify(&password),
        None => {
            let _ = Password::hash(&password);
            false
        }
    })
    .await
    .map_err(|e| AppError::internal(op, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MockStorage;
    use domain::App;
    use jsonwebtoken::{decode, DecodingKey, Validation};
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    const PASSWORD: &str = "Sup3rSecr3t!";

    fn service(storage: MockStorage) -> Authenticator {
        Authenticator::new(Arc::new(storage), TokenConfig { ttl_seconds: 3600 })
    }

    fn alice() -> User {
        User {
            id: 1,
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: Password::hash(PASSWORD).unwrap(),
            is_admin: false,
        }
    }

    fn test_app() -> App {
        App {
            id: 1,
            name: "test".to_string(),
            secret: "test-secret".to_string(),
        }
    }

    fn db_error() -> StorageError {
        StorageError::Database(DbErr::Custom("connection reset".to_string()))
    }

    #[tokio::test]
    async fn test_sign_up_hashes_and_saves() {
        let mut storage = MockStorage::new();
        storage
            .expect_save_user()
            .withf(|user| {
                user.name == "alice"
                    && user.email == "alice@example.com"
                    && user.is_admin
                    && user.password_hash.as_bytes() != PASSWORD.as_bytes()
                    && user.password_hash.verify(PASSWORD)
            })
            .times(1)
            .returning(|_| Ok(7));

        let id = service(storage)
            .sign_up(
                "alice".to_string(),
                "alice@example.com".to_string(),
                PASSWORD.to_string(),
                true,
            )
            .await
            .unwrap();

        assert_eq!(id, 7);
    }

    #[tokio::test]
    async fn test_sign_up_conflict() {
        let mut storage = MockStorage::new();
        storage
            .expect_save_user()
            .returning(|_| Err(StorageError::UserExists));

        let result = service(storage)
            .sign_up(
                "alice".to_string(),
                "alice@example.com".to_string(),
                PASSWORD.to_string(),
                false,
            )
            .await;

        assert!(matches!(result, Err(AppError::UserAlreadyExists)));
    }

    #[tokio::test]
    async fn test_sign_up_store_failure_is_internal() {
        let mut storage = MockStorage::new();
        storage.expect_save_user().returning(|_| Err(db_error()));

        let err = service(storage)
            .sign_up(
                "alice".to_string(),
                "alice@example.com".to_string(),
                PASSWORD.to_string(),
                false,
            )
            .await
            .unwrap_err();

        assert!(err.is_internal());
        assert!(!err.to_string().contains(PASSWORD));
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let mut storage = MockStorage::new();
        storage
            .expect_find_user_by_email()
            .times(1)
            .returning(|_| Ok(alice()));
        storage
            .expect_find_app()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(test_app()));

        let token = service(storage)
            .sign_in("alice@example.com".to_string(), PASSWORD.to_string(), 1)
            .await
            .unwrap();

        let claims = decode::<token::Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;
        assert_eq!(claims.uid, 1);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.app_id, 1);
    }

    #[tokio::test]
    async fn test_sign_in_unknown_email() {
        let mut storage = MockStorage::new();
        storage
            .expect_find_user_by_email()
            .returning(|_| Err(StorageError::UserNotFound));
        storage.expect_find_app().never();

        let result = service(storage)
            .sign_in("nobody@example.com".to_string(), PASSWORD.to_string(), 1)
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password_never_resolves_app() {
        let mut storage = MockStorage::new();
        storage
            .expect_find_user_by_email()
            .returning(|_| Ok(alice()));
        storage.expect_find_app().never();

        let result = service(storage)
            .sign_in("alice@example.com".to_string(), "wrong".to_string(), 999)
            .await;

        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_app() {
        let mut storage = MockStorage::new();
        storage
            .expect_find_user_by_email()
            .returning(|_| Ok(alice()));
        storage
            .expect_find_app()
            .returning(|_| Err(StorageError::AppNotFound));

        let result = service(storage)
            .sign_in("alice@example.com".to_string(), PASSWORD.to_string(), 2)
            .await;

        assert!(matches!(result, Err(AppError::InvalidAppId)));
    }

    #[tokio::test]
    async fn test_sign_in_store_failures_are_internal() {
        let mut storage = MockStorage::new();
        storage
            .expect_find_user_by_email()
            .returning(|_| Err(db_error()));

        let err = service(storage)
            .sign_in("alice@example.com".to_string(), PASSWORD.to_string(), 1)
            .await
            .unwrap_err();
        assert!(err.is_internal());

        let mut storage = MockStorage::new();
        storage
            .expect_find_user_by_email()
            .returning(|_| Ok(alice()));
        storage.expect_find_app().returning(|_| Err(db_error()));

        let err = service(storage)
            .sign_in("alice@example.com".to_string(), PASSWORD.to_string(), 1)
            .await
            .unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_new_builds_dummy_hash() {
        let _service = service(MockStorage::new());

        let dummy = Lazy::get(&DUMMY_PASSWORD).expect("dummy hash is built by new");
        let dummy = dummy.as_ref().expect("dummy hash uses valid parameters");
        assert!(!dummy.verify(PASSWORD));
    }

    #[tokio::test]
    async fn test_verify_dummy_never_matches() {
        assert!(!verify_dummy("test", PASSWORD.to_string()).await.unwrap());
        assert!(!verify_dummy("test", String::new()).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_admin() {
        let mut storage = MockStorage::new();
        storage
            .expect_is_admin()
            .with(eq(3))
            .returning(|_| Ok(true));

        assert!(service(storage).is_admin(3).await.unwrap());
    }

    #[tokio::test]
    async fn test_is_admin_not_found() {
        let mut storage = MockStorage::new();
        storage
            .expect_is_admin()
            .returning(|_| Err(StorageError::UserNotFound));

        let result = service(storage).is_admin(42).await;

        assert!(matches!(result, Err(AppError::UserNotFound)));
    }

    #[tokio::test]
    async fn test_is_admin_store_failure_is_internal() {
        let mut storage = MockStorage::new();
        storage.expect_is_admin().returning(|_| Err(db_error()));

        let err = service(storage).is_admin(1).await.unwrap_err();

        assert!(err.is_internal());
        assert!(std::error::Error::source(&err).is_some());
    }
}
