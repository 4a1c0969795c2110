//! User domain entity and related types.

use crate::password::Password;

/// Registered user as held by the credential store.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: Password,
    pub is_admin: bool,
}

impl User {
    /// Check a plain text password against the stored hash
    pub fn verify_password(&self, plain_text: &str) -> bool {
        self.password_hash.verify(plain_text)
    }
}

/// Data needed to persist a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: Password,
    pub is_admin: bool,
}
