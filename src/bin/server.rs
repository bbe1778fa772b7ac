//! filekv Server Binary
//!
//! Bootstraps the datastore directory and serves the HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use filekv::{http, Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// Environment fallback for the datastore directory
const DATA_DIR_ENV: &str = "FILEKV_DATA_DIR";

/// filekv Server
#[derive(Parser, Debug)]
#[command(name = "filekv-server")]
#[command(about = "Minimal persistent JSON key-value store over HTTP")]
#[command(version)]
struct Args {
    /// Datastore directory (falls back to $FILEKV_DATA_DIR, then ./filekv_data)
    #[arg(short, long)]
    datastore: Option<PathBuf>,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:5000")]
    listen: String,

    /// Worker threads for batch stamping
    #[arg(short = 'w', long, default_value = "4")]
    stamp_workers: usize,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,filekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    let data_dir = resolve_data_dir(args.datastore);

    tracing::info!("filekv Server v{}", filekv::VERSION);
    tracing::info!("Datastore directory: {}", data_dir.display());
    tracing::info!("Listen address: {}", args.listen);

    // Bootstrap the datastore directory; the engine itself never creates it
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(
            "Permission denied: cannot create the datastore directory `{}`: {e}",
            data_dir.display()
        );
        std::process::exit(1);
    }

    // Build config from args
    let config = Config::builder()
        .data_dir(&data_dir)
        .listen_addr(&args.listen)
        .stamp_workers(args.stamp_workers)
        .build();

    let engine = Arc::new(Engine::new(config.clone()));
    let app = http::router(engine);

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {e}", config.listen_addr);
            std::process::exit(1);
        }
    };

    tracing::info!("Serving on http://{}", config.listen_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Data dir resolution: CLI flag > environment > built-in default
fn resolve_data_dir(arg: Option<PathBuf>) -> PathBuf {
    arg.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| Config::default().data_dir)
}
