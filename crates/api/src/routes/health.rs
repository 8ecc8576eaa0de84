//! Liveness and database reachability check, mounted at the root.

use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Longest the database ping may take before the service counts as degraded.
const DB_PING_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Serialize)]
pub struct DatabaseHealth {
    pub reachable: bool,
    /// Round-trip of `SELECT 1`; absent when the ping failed or timed out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: ServiceStatus,
    pub version: &'static str,
    pub database: DatabaseHealth,
}

/// GET /health
///
/// 200 with `status: "ok"` when the database answers in time, 503 with
/// `status: "degraded"` otherwise.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = ping_database(&state).await;
    let (code, status) = if database.reachable {
        (StatusCode::OK, ServiceStatus::Ok)
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, ServiceStatus::Degraded)
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
    };
    (code, Json(report))
}

async fn ping_database(state: &AppState) -> DatabaseHealth {
    let started = Instant::now();
    match tokio::time::timeout(DB_PING_TIMEOUT, ridgeline_db::health_check(&state.pool)).await {
        Ok(Ok(())) => DatabaseHealth {
            reachable: true,
            latency_ms: Some(started.elapsed().as_millis() as u64),
        },
        Ok(Err(err)) => {
            tracing::warn!(error = %err, "Database ping failed");
            DatabaseHealth {
                reachable: false,
                latency_ms: None,
            }
        }
        Err(_) => {
            tracing::warn!(timeout_ms = DB_PING_TIMEOUT.as_millis() as u64, "Database ping timed out");
            DatabaseHealth {
                reachable: false,
                latency_ms: None,
            }
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
