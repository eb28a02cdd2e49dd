//! `hostel-office` binary: serve the API, or provision the database once.

use clap::{Parser, Subcommand};
use hostel_office::{app, apply_schema_file, connect_lazy, AppConfig, AppState, SchemaOutcome};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hostel-office", version, about = "Hostel management back office")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default).
    Serve,
    /// Create the database if needed and apply the schema script.
    InitDb {
        /// Schema script; defaults to HOSTEL_SCHEMA_PATH.
        #[arg(long)]
        schema: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hostel_office=info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::InitDb { schema } => {
            let path = schema.unwrap_or_else(|| config.schema_path.clone());
            match apply_schema_file(&config.database, &path).await? {
                SchemaOutcome::Skipped => {
                    tracing::info!(path = %path.display(), "nothing to apply")
                }
                SchemaOutcome::Applied { statements } => {
                    tracing::info!(statements, "schema applied")
                }
            }
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pool = connect_lazy(&config.database);
    let state = AppState::new(pool);
    let app = app(state, &config.server);

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    tracing::info!(
        database = %config.database.name,
        "listening on {}",
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}
