#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Emberchain engine entrypoint (systemd-friendly).
//! Opens the committed state and keeps the process alive for the consensus
//! host; transaction flow is driven entirely by the host.

use std::sync::Arc;

use tracing::{info, warn};

use emberchain::core::app::Application;
use emberchain::core::config::StorageConfig;
use emberchain::monitoring::metrics::Metrics;

#[tokio::main]
async fn main() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .compact()
        .try_init();

    let cfg = StorageConfig::from_env();
    info!(db_path = %cfg.db_path, keep_blocks = cfg.keep_blocks, "emberchain engine starting");

    let metrics: Arc<Metrics> = Arc::new(Metrics::new().expect("metrics init failed"));

    let mut app = match Application::open(&cfg) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("engine open failed: {e}");
            std::process::exit(1);
        }
    };
    app.attach_metrics(metrics);

    let position = app.info();
    info!(
        height = position.last_block_height,
        app_hash = %hex::encode(&position.app_hash),
        "engine ready; awaiting consensus host"
    );

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(?e, "signal listener failed");
    }
    info!("shutting down");
}
