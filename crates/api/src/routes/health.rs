use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
}

/// Readiness response payload.
#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    /// `postgres` or `memory`.
    pub storage: &'static str,
}

/// GET /health -- liveness only, never touches storage.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /ready -- 503 while the database is unreachable.
async fn ready_check(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let Some(pool) = &state.pool else {
        return (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                storage: "memory",
            }),
        );
    };

    match dlife_db::health_check(pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ReadyResponse {
                status: "ready",
                storage: "postgres",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Database readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ReadyResponse {
                    status: "unavailable",
                    storage: "postgres",
                }),
            )
        }
    }
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
}
