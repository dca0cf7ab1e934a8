//! pairpadd - the pairpad room synchronization server.

use pairpad::config::Config;
use pairpad::state::RoomRegistry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "pairpad.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(server = %config.server.name, "Starting pairpadd");

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint (used by tests).
    let metrics_port = config.server.metrics_port.unwrap_or(9090);
    if metrics_port == 0 {
        info!("Metrics disabled");
    } else {
        pairpad::metrics::init();
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], metrics_port));
        tokio::spawn(async move {
            // A dead scrape endpoint is an operations problem, not a
            // reason to take rooms down with it.
            if let Err(e) = pairpad::http::run_metrics_server(addr).await {
                error!(address = %addr, error = %e, "Metrics server failed");
            }
        });
    }

    // Room directory and API surface
    let registry = RoomRegistry::new();
    let app = pairpad::api::router(registry);

    let listener = tokio::net::TcpListener::bind(config.listen.address).await?;
    info!(address = %config.listen.address, "API listener bound");

    axum::serve(listener, app).await?;

    Ok(())
}
