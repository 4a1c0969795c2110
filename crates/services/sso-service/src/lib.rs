//! SSO Service Library
//!
//! Registers users, authenticates them and issues app-scoped tokens over
//! gRPC. The credential logic lives in [`service`] and [`token`]; storage
//! providers, schema migrations and the transport are wired up here.

pub mod config;
pub mod grpc;
pub mod infra;
pub mod service;
pub mod shutdown;
pub mod storage;
pub mod telemetry;
pub mod token;

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Server;
use tracing::{info, warn};

use crate::config::SsoConfig;
use crate::grpc::AuthGrpcService;
use crate::infra::Database;
use crate::service::Authenticator;
use crate::storage::{MemoryStore, SqlStore, Storage};
use common::BoxError;
use domain::App;

/// Credential store backing a server run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StorageBackend {
    /// Relational database at the configured URL
    #[default]
    Sql,
    /// Process memory; contents are lost on exit
    Memory,
}

/// Run the SSO service until SIGINT or SIGTERM.
///
/// `dev_app` is provisioned into the memory backend; the SQL backend reads
/// apps from its `apps` table.
pub async fn run(
    config: SsoConfig,
    backend: StorageBackend,
    dev_app: Option<App>,
) -> Result<(), BoxError> {
    let storage = open_storage(&config, backend, dev_app).await?;

    let addr = config.grpc.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    serve(listener, storage, &config, shutdown::wait_for_signal()).await
}

/// Serve the gRPC API on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    storage: Arc<dyn Storage>,
    config: &SsoConfig,
    shutdown: F,
) -> Result<(), BoxError>
where
    F: Future<Output = ()> + Send,
{
    let addr = listener.local_addr()?;
    let incoming = TcpIncoming::from_listener(listener, true, None)?;

    let auth_service = Arc::new(Authenticator::new(storage, config.token.clone()));
    let grpc_service = AuthGrpcService::new(auth_service);

    info!(%addr, token_ttl_seconds = config.token.ttl_seconds, "grpc server is running");

    Server::builder()
        .timeout(config.grpc.timeout())
        .add_service(proto::AuthServer::new(grpc_service))
        .serve_with_incoming_shutdown(incoming, shutdown)
        .await?;

    info!("grpc server stopped");
    Ok(())
}

async fn open_storage(
    config: &SsoConfig,
    backend: StorageBackend,
    dev_app: Option<App>,
) -> Result<Arc<dyn Storage>, BoxError> {
    match backend {
        StorageBackend::Sql => {
            let db = Database::connect(&config.database).await?;
            Ok(Arc::new(SqlStore::new(db.get_connection())))
        }
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            if let Some(app) = dev_app {
                info!(app_id = app.id, app_name = %app.name, "provisioning in-memory app");
                store.add_app(app).await?;
            } else {
                warn!("memory storage has no apps; every sign-in will fail");
            }
            Ok(Arc::new(store))
        }
    }
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &SsoConfig, action: MigrateAction) -> Result<(), BoxError> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Provision an application in the SQL store (for CLI commands).
pub async fn provision_app(
    config: &SsoConfig,
    id: Option<i32>,
    name: String,
    secret: String,
) -> Result<App, BoxError> {
    let db = Database::connect(&config.database).await?;
    let store = SqlStore::new(db.get_connection());

    let app = store.create_app(id, name, secret).await?;
    info!(app_id = app.id, app_name = %app.name, "app provisioned");
    Ok(app)
}
