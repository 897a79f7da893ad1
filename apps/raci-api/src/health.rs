//! Health check endpoints.
//!
//! - `/health` — liveness: the process is up
//! - `/readyz` — readiness: the database answers a ping

use axum::{http::StatusCode, Extension, Json};
use serde::Serialize;
use sqlx::PgPool;

/// Health check response body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health — always healthy while the process runs.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /readyz — ready once the database answers.
pub async fn readyz_handler(
    Extension(pool): Extension<PgPool>,
) -> Result<Json<HealthResponse>, StatusCode> {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(&pool).await {
        Ok(_) => Ok(Json(HealthResponse { status: "ok" })),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
