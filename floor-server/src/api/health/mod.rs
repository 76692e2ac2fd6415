//! Health check routes
//!
//! | Path | Method | Description | Auth |
//! |------|--------|-------------|------|
//! | /api/health | GET | Basic health check | none |
//! | /api/health/detailed | GET | Component-level checks | none |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::time::SystemTime;

use crate::core::ServerState;

/// Health routes - public, no authentication
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/health/detailed", get(detailed_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// healthy | degraded
    status: &'static str,
    service: &'static str,
    version: &'static str,
    environment: String,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    /// Seconds since the process started
    uptime_seconds: u64,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    storage: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    latency_ms: Option<u64>,
    message: Option<String>,
}

impl CheckResult {
    fn ok_with_latency(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

// Process start time, initialized on first health request
static START_TIME: std::sync::OnceLock<SystemTime> = std::sync::OnceLock::new();

fn get_uptime_seconds() -> u64 {
    let start = START_TIME.get_or_init(SystemTime::now);
    SystemTime::now()
        .duration_since(*start)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Basic health check
pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    let storage_ok = state.orders.storage().ping().is_ok();
    Json(HealthResponse {
        status: if storage_ok { "healthy" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

/// Detailed health check with storage round-trip
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let start = std::time::Instant::now();
    let storage_check = match state.orders.storage().ping() {
        Ok(()) => CheckResult::ok_with_latency(start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(format!("Storage error: {}", e)),
    };

    let all_ok = storage_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: get_uptime_seconds(),
        checks: HealthChecks {
            storage: storage_check,
        },
    })
}
