use axum::extract::State;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app::AppState;
use crate::errors::AppResult;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the database check fails
    pub status: &'static str,
    pub db_ok: bool,
    pub db_error: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Service and database status", body = HealthResponse))
)]
pub async fn health(State(state): State<AppState>) -> AppResult<Json<HealthResponse>> {
    let response = match sqlx::query_scalar::<_, i64>("SELECT COUNT(1) FROM schools")
        .fetch_one(&state.pool)
        .await
    {
        Ok(_) => HealthResponse { status: "ok", db_ok: true, db_error: None },
        Err(err) => {
            tracing::warn!(error = %err, "health check could not reach the database");
            HealthResponse { status: "degraded", db_ok: false, db_error: Some(err.to_string()) }
        }
    };

    Ok(Json(response))
}
