//! Application (tenant) entity.

/// Registered consumer of the SSO service.
///
/// Tokens issued for an app are signed with its `secret`.
#[derive(Clone)]
pub struct App {
    pub id: i32,
    pub name: String,
    pub secret: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl App {
    /// Key material for signing this app's tokens
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}
