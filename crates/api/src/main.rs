use api::state::AppState;
use bulletin_core::config::Settings;
use clap::Parser;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "bulletin-api")]
#[command(about = "Read-only channel and article API", version)]
struct Args {
    /// Listen address, overrides BULLETIN_API_BIND
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let args = Args::parse();

    info!(
        has_database_url = has_var("DATABASE_URL") || has_var("BULLETIN_DATABASE_URL"),
        has_supabase_url = has_var("SUPABASE_URL"),
        has_supabase_service_key = has_var("SUPABASE_SERVICE_KEY"),
        "api routes initializing"
    );

    let settings = Settings::from_env()?;
    info!(
        env = %settings.bulletin_env,
        store = settings.store.backend_name(),
        enrich_concurrency = ?settings.enrich_concurrency,
        "configuration loaded"
    );

    let store = db::connect(&settings.store).await?;
    let state = AppState::new(store, settings.enrich_concurrency);

    let addr: SocketAddr = args.bind.unwrap_or(settings.api_bind).parse()?;

    info!(%addr, "starting api");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, api::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn has_var(key: &str) -> bool {
    std::env::var_os(key).is_some()
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
