use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::app::AppState;
use crate::authz::{secrets_match, AdminContext, Role};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub password: Option<String>,
}

/// `token` is the bearer credential for the admin routes.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub role: Role,
    #[schema(value_type = Option<String>)]
    pub tenant_id: Option<String>,
    pub is_super_admin: bool,
}

impl From<AdminContext> for SessionResponse {
    fn from(ctx: AdminContext) -> Self {
        Self {
            role: ctx.role,
            tenant_id: ctx.tenant_id.map(String::from),
            is_super_admin: ctx.is_super_admin,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/admin/whoami",
    tag = "Session",
    params(
        ("X-Escuela-Id" = Option<String>, Header, description = "School id"),
        ("escuelaId" = Option<String>, Query, description = "School id, when the header is absent")
    ),
    responses(
        (status = 200, description = "Role and school resolved for the credential", body = SessionResponse),
        (status = 401, description = "No credential matched"),
        (status = 404, description = "School not found or inactive")
    )
)]
pub async fn whoami(ctx: AdminContext) -> AppResult<Json<SessionResponse>> {
    Ok(Json(ctx.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/login",
    tag = "Session",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Password accepted", body = LoginResponse),
        (status = 401, description = "Wrong password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let expected = &state.config.auth.global_admin_secret;
    let presented = payload.password.unwrap_or_default();

    if presented.is_empty() || !secrets_match(&presented, expected) {
        tracing::warn!("admin login rejected");
        return Err(AppError::unauthorized("Contraseña incorrecta"));
    }

    tracing::info!("admin login");
    Ok(Json(LoginResponse {
        success: true,
        token: expected.clone(),
    }))
}
