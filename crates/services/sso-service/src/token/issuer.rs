//! Token issuer - turns a signed-in user into an app-scoped JWT.
//!
//! Tokens are HS256-signed with the application's own secret, so only that
//! application (and this service) can verify them. Verification happens
//! downstream; nothing here decodes tokens.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult};
use domain::{App, User};

/// JWT claims payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub uid: i64,
    pub email: String,
    pub app_id: i32,
    /// Expiry as unix seconds
    pub exp: i64,
}

impl Claims {
    /// Build the claim set for `user` in `app`, expiring `ttl` from now.
    pub fn new(user: &User, app: &App, ttl: Duration) -> AppResult<Self> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| AppError::internal("token.claims", e))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::internal("token.claims", "token expiry out of range"))?;

        Ok(Self {
            uid: user.id,
            email: user.email.clone(),
            app_id: app.id,
            exp: expires_at.timestamp(),
        })
    }
}

/// Issue a signed token for `user` scoped to `app`.
pub fn issue(user: &User, app: &App, ttl: Duration) -> AppResult<String> {
    let claims = Claims::new(user, app, ttl)?;
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(app.secret_bytes()),
    )?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Password;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    fn test_user() -> User {
        User {
            id: 42,
            name: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: Password::from_hash(b"unused".to_vec()),
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

    fn decode_claims(token: &str, secret: &str) -> jsonwebtoken::errors::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
            .map(|data| data.claims)
    }

    #[test]
    fn test_issue_embeds_claims() {
        let ttl = Duration::from_secs(3600);
        let issued_at = Utc::now().timestamp();

        let token = issue(&test_user(), &test_app(), ttl).unwrap();
        let claims = decode_claims(&token, "test-secret").unwrap();

        assert_eq!(claims.uid, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.app_id, 1);
        assert!((claims.exp - (issued_at + 3600)).abs() <= 1);
    }

    #[test]
    fn test_token_is_hs256() {
        let token = issue(&test_user(), &test_app(), Duration::from_secs(60)).unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();

        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_wrong_secret_fails_verification() {
        let token = issue(&test_user(), &test_app(), Duration::from_secs(60)).unwrap();

        assert!(decode_claims(&token, "other-secret").is_err());
    }

    #[test]
    fn test_tokens_are_scoped_per_app() {
        let other = App {
            id: 2,
            name: "other".to_string(),
            secret: "other-secret".to_string(),
        };

        let token = issue(&test_user(), &other, Duration::from_secs(60)).unwrap();

        assert_eq!(decode_claims(&token, "other-secret").unwrap().app_id, 2);
        assert!(decode_claims(&token, "test-secret").is_err());
    }

    #[test]
    fn test_wire_claim_names() {
        let claims = Claims::new(&test_user(), &test_app(), Duration::from_secs(60)).unwrap();
        let value = serde_json::to_value(&claims).unwrap();

        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, ["app_id", "email", "exp", "uid"]);
    }

    #[test]
    fn test_absurd_ttl_is_internal() {
        let err = Claims::new(&test_user(), &test_app(), Duration::from_secs(u64::MAX)).unwrap_err();

        assert!(err.is_internal());
    }
}
