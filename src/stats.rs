//! HTTP status surface over the pipeline metrics
use std::io;
use std::net::SocketAddr;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::info;

use crate::metrics::{MetricsSnapshot, SharedMetrics};
use crate::shutdown::ShutdownSignal;

pub fn router(metrics: SharedMetrics) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stats", get(stats))
        .with_state(metrics)
}

pub async fn bind(addr: SocketAddr) -> io::Result<TcpListener> {
    TcpListener::bind(addr).await
}

/// Serve until `shutdown` fires.
pub async fn serve(
    listener: TcpListener,
    metrics: SharedMetrics,
    mut shutdown: ShutdownSignal,
) -> io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "stats endpoint listening");
    }
    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(async move { shutdown.triggered().await })
        .await
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn stats(State(metrics): State<SharedMetrics>) -> Json<MetricsSnapshot> {
    Json(metrics.read().await.snapshot())
}
