//! SSO service configuration.

use std::env;

use common::{DatabaseConfig, Environment, GrpcServerConfig, TokenConfig};

/// SSO service configuration.
#[derive(Debug, Clone, Default)]
pub struct SsoConfig {
    /// Deployment environment (log format and level)
    pub env: Environment,
    /// Credential store connection
    pub database: DatabaseConfig,
    /// Token lifetime
    pub token: TokenConfig,
    /// gRPC listener
    pub grpc: GrpcServerConfig,
}

impl SsoConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or malformed values fall back to their defaults.
    pub fn from_env() -> Self {
        let database_defaults = DatabaseConfig::default();
        let token_defaults = TokenConfig::default();
        let grpc_defaults = GrpcServerConfig::default();

        Self {
            env: env::var("SSO_ENV")
                .or_else(|_| env::var("ENV"))
                .ok()
                .and_then(|e| e.parse().ok())
                .unwrap_or_default(),
            database: DatabaseConfig {
                url: env::var("SSO_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(database_defaults.url),
                max_connections: parse_var("SSO_DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(database_defaults.max_connections),
                min_connections: parse_var("SSO_DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(database_defaults.min_connections),
            },
            token: TokenConfig {
                ttl_seconds: parse_var("SSO_TOKEN_TTL_SECONDS")
                    .unwrap_or(token_defaults.ttl_seconds),
            },
            grpc: GrpcServerConfig {
                host: env::var("SSO_GRPC_HOST").unwrap_or(grpc_defaults.host),
                port: parse_var("SSO_GRPC_PORT").unwrap_or(grpc_defaults.port),
                timeout_ms: parse_var("SSO_GRPC_TIMEOUT_MS").unwrap_or(grpc_defaults.timeout_ms),
            },
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
