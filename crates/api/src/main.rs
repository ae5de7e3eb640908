use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

use carecircle_api::app::create_app;
use carecircle_api::config::Config;
use carecircle_api::jobs::{InvitationCleanupJob, JobScheduler, PoolMetricsJob};
use carecircle_api::middleware::logging::init_logging;
use carecircle_api::middleware::metrics::init_metrics;
use carecircle_api::services::ledger::{HttpLedgerGateway, LedgerGateway};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging);
    init_metrics();

    info!("Starting CareCircle cache API v{}", env!("CARGO_PKG_VERSION"));

    let pool = persistence::db::create_pool(&config.database).await?;

    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // The gateway is optional; without it every cache miss is simply a miss.
    let ledger: Option<Arc<dyn LedgerGateway>> = if config.ledger.enabled {
        match HttpLedgerGateway::from_config(&config.ledger) {
            Ok(gateway) => {
                info!(rpc_url = %config.ledger.rpc_url, "Ledger gateway configured");
                Some(Arc::new(gateway))
            }
            Err(err) => {
                warn!(error = %err, "Ledger gateway unusable; running cache-only");
                None
            }
        }
    } else {
        info!("Ledger gateway disabled; running cache-only");
        None
    };

    let mut scheduler = JobScheduler::new();
    scheduler.register(InvitationCleanupJob::new(pool.clone()));
    scheduler.register(PoolMetricsJob::new(pool.clone()));
    scheduler.start();

    let app = create_app(config.clone(), pool, ledger);

    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(5)).await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
