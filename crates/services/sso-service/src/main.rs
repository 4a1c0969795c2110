//! SSO Service - gRPC server for single sign-on credentials.

use clap::{Parser, Subcommand};

use common::BoxError;
use domain::App;
use sso_service_lib::config::SsoConfig;
use sso_service_lib::{telemetry, MigrateAction, StorageBackend};

#[derive(Parser)]
#[command(name = "sso")]
#[command(about = "Single sign-on credential service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gRPC server
    Serve {
        /// Bind host (overrides SSO_GRPC_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (overrides SSO_GRPC_PORT)
        #[arg(long)]
        port: Option<u16>,
        /// Credential store backend
        #[arg(long, value_enum, default_value_t = StorageBackend::Sql)]
        storage: StorageBackend,
        /// Secret of app 1, provisioned into the memory backend
        #[arg(long, env = "SSO_DEV_APP_SECRET", required_if_eq("storage", "memory"))]
        dev_app_secret: Option<String>,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
    /// Application (tenant) management
    App {
        #[command(subcommand)]
        action: AppCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[derive(Subcommand)]
enum AppCommands {
    /// Provision a new application
    Add {
        /// Unique application name
        #[arg(long)]
        name: String,
        /// Secret used to sign the application's tokens
        #[arg(long, env = "SSO_APP_SECRET")]
        secret: String,
        /// Explicit application ID (assigned by the database if omitted)
        #[arg(long)]
        id: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let mut config = SsoConfig::from_env();
    telemetry::init_tracing(config.env);
    tracing::info!(env = %config.env, "starting application");

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            storage,
            dev_app_secret,
        } => {
            if let Some(host) = host {
                config.grpc.host = host;
            }
            if let Some(port) = port {
                config.grpc.port = port;
            }
            let dev_app = dev_app_secret.map(|secret| App {
                id: 1,
                name: "dev".to_string(),
                secret,
            });

            sso_service_lib::run(config, storage, dev_app).await?;
            tracing::info!("application stopped");
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            sso_service_lib::run_migrations(&config, migrate_action).await?;
        }
        Commands::App { action } => match action {
            AppCommands::Add { name, secret, id } => {
                let app = sso_service_lib::provision_app(&config, id, name, secret).await?;
                println!("{}\t{}", app.id, app.name);
            }
        },
    }

    Ok(())
}
