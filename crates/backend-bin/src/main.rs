use anyhow::Context;
use backend_lib::{config::Settings, router, AppState};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Commerce member API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (TOML); missing files fall back to defaults
    #[arg(short, long, default_value = backend_lib::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let bind_addr = settings.bind_addr;
    let purge_interval = settings.cache_purge_interval();

    // Create application state
    let state = Arc::new(AppState::with_flat_file_store(settings)?);
    let _purge = state.credential_cache.spawn_purge_task(purge_interval);

    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    info!(%bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}
