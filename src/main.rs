use anyhow::Context;
use axum::Router;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use notes_api_rust::config::config;
use notes_api_rust::routes::{auth_router, cors_layer, notes_router};
use notes_api_rust::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Service {
    Auth,
    Notes,
    All,
}

#[derive(Debug, Parser)]
#[command(name = "notes-api-rust", version, about = "Auth and notes HTTP services")]
struct Cli {
    /// Which service(s) this process serves
    #[arg(long, value_enum, default_value_t = Service::All)]
    service: Service,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = config();
    config.validate().context("refusing to start with invalid configuration")?;
    tracing::info!("Starting notes-api-rust ({:?}) in {:?} mode", cli.service, config.environment);

    let state = AppState::from_config(config).await?;
    let cors = cors_layer(&config.security);
    let host = config.server.host.as_str();

    let auth = serve("auth", host, config.server.auth_port, auth_router(state.clone()).layer(cors.clone()));
    let notes = serve("notes", host, config.server.notes_port, notes_router(state).layer(cors));

    match cli.service {
        Service::Auth => auth.await,
        Service::Notes => notes.await,
        Service::All => tokio::try_join!(auth, notes).map(|_| ()),
    }
}

async fn serve(name: &str, host: &str, port: u16, app: Router) -> anyhow::Result<()> {
    let bind_addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {} service to {}", name, bind_addr))?;

    tracing::info!("{} service listening on http://{}", name, bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .with_context(|| format!("{} service stopped unexpectedly", name))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
