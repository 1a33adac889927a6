use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagcompleto_processor::app::{telemetry, Config};
use pagcompleto_processor::handlers::{self, AppState};
use pagcompleto_processor::services::{PagcompletoClient, PaymentProcessor};
use pagcompleto_processor::store::PgStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Processa pagamentos pendentes via gateway PAGCOMPLETO")]
struct Cli {
    /// Optional TOML config file; environment variables take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP trigger (POST /process-payments)
    Serve,
    /// Process one batch and print the report
    Run {
        /// Print the report on a single line
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    let processor = build_processor(&config).await?;

    match cli.command {
        Command::Serve => serve(processor, &config).await,
        Command::Run { compact } => {
            let report = processor
                .process_pending_payments()
                .await
                .context("Erro durante o processamento")?;
            let rendered = if compact {
                serde_json::to_string(&report)?
            } else {
                serde_json::to_string_pretty(&report)?
            };
            println!("{}", rendered);
            Ok(())
        }
    }
}

async fn build_processor(config: &Config) -> Result<PaymentProcessor> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not set")?;

    let store = PgStore::connect(database_url, config.db_max_connections)
        .await
        .context("failed to connect to the database")?;
    let gateway = PagcompletoClient::new(&config.gateway).context("failed to build gateway client")?;

    Ok(PaymentProcessor::new(
        Arc::new(store),
        Arc::new(gateway),
        config.access_token.clone(),
    ))
}

async fn serve(processor: PaymentProcessor, config: &Config) -> Result<()> {
    let state = Arc::new(AppState::new(processor, config.pretty_report));
    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
