//! Tracing subscriber setup.

use common::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber for the given environment.
///
/// `local` logs human-readable lines and `dev` logs JSON, both with this
/// crate at debug level. `prod` logs JSON at info level. `RUST_LOG`
/// overrides the filter in every environment.
pub fn init_tracing(env: Environment) {
    let default_level = match env {
        Environment::Local | Environment::Dev => "info,sso=debug,sso_service_lib=debug",
        Environment::Prod => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into());

    let registry = tracing_subscriber::registry().with(filter);
    match env {
        Environment::Local => registry.with(tracing_subscriber::fmt::layer()).init(),
        Environment::Dev | Environment::Prod => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}
