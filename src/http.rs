//! Prometheus scrape endpoint.
//!
//! Served on its own listener, separate from the API surface, so
//! operators can firewall it independently and a stalled scrape never
//! competes with room traffic.

use axum::{Router, routing::get};
use std::io;
use std::net::SocketAddr;

/// Router serving `GET /metrics` in Prometheus text format.
pub fn metrics_router() -> Router {
    Router::new()
        .route("/metrics", get(|| async { crate::metrics::gather_metrics() }))
}

/// Bind `addr` and serve the scrape endpoint until the process exits.
///
/// Bind and serve errors propagate to the caller, which decides whether
/// a missing metrics endpoint is fatal.
pub async fn run_metrics_server(addr: SocketAddr) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Metrics listener bound");
    axum::serve(listener, metrics_router()).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scrape_endpoint_serves_metric_families() {
        crate::metrics::init();
        crate::metrics::record_update();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, metrics_router()).await.expect("serve");
        });

        let body = reqwest::get(format!("http://{addr}/metrics"))
            .await
            .expect("scrape")
            .error_for_status()
            .expect("200")
            .text()
            .await
            .expect("body");
        assert!(body.contains("pairpad_updates_total"), "got: {body}");
    }
}
