//! Health check handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::time::Instant;

use crate::state::AppState;

const SERVICE: &str = "bazaar-api";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub checks: ReadyChecks,
}

#[derive(Debug, Serialize)]
pub struct ReadyChecks {
    pub database: CheckResult,
    pub cache: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: &'static str,
    pub latency_ms: u64,
}

impl CheckResult {
    fn from_outcome<T, E: std::fmt::Display>(
        name: &'static str,
        result: Result<T, E>,
        start: Instant,
    ) -> Self {
        let latency_ms = start.elapsed().as_millis() as u64;
        let status = match result {
            Ok(_) => "ok",
            Err(e) => {
                tracing::warn!(check = name, error = %e, "Readiness check failed");
                "error"
            }
        };
        Self { status, latency_ms }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// GET /health - Liveness check (fast, no dependencies)
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE,
    })
}

/// GET /ready - Readiness check (checks PostgreSQL and Redis)
pub async fn ready(State(state): State<AppState>) -> Response {
    let start = Instant::now();
    let db_result = sqlx::query("SELECT 1").fetch_one(&*state.pool).await;
    let database = CheckResult::from_outcome("database", db_result, start);

    let start = Instant::now();
    let cache = CheckResult::from_outcome("cache", state.cache.ping().await, start);

    let (code, status) = if database.is_ok() && cache.is_ok() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    };

    (
        code,
        Json(ReadyResponse {
            status,
            service: SERVICE,
            checks: ReadyChecks { database, cache },
        }),
    )
        .into_response()
}
