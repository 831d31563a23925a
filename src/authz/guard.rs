use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, Uri};

use super::{secrets_match, AdminContext};
use crate::app::AppState;
use crate::config::AuthConfig;
use crate::errors::{AppError, AppResult};
use crate::tenant::{resolve_tenant_id, TenantStore};

pub fn bearer_credential(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Classifies the request's bearer credential. First match wins:
/// 1. super-admin secret -> super-admin, global scope
/// 2. global admin secret -> school-admin; a named school must exist and be active
/// 3. named school's own secret (or the global one when it has none) -> school-admin of that school
/// 4. unauthorized
pub async fn authenticate_admin(
    auth: &AuthConfig,
    store: &dyn TenantStore,
    headers: &HeaderMap,
    uri: &Uri,
) -> AppResult<AdminContext> {
    let requested = resolve_tenant_id(headers, uri);

    let Some(credential) = bearer_credential(headers) else {
        tracing::debug!("admin request without bearer credential");
        return Err(AppError::unauthorized("no autorizado"));
    };

    if secrets_match(credential, &auth.super_admin_secret) {
        tracing::debug!(requested_tenant = ?requested, "super_admin credential");
        return Ok(AdminContext::super_admin().with_requested_tenant(requested));
    }

    if secrets_match(credential, &auth.global_admin_secret) {
        if let Some(id) = &requested {
            if store.find_active(id).await?.is_none() {
                tracing::warn!(tenant = %id, "global admin credential for unknown or inactive school");
                return Err(AppError::tenant_not_found("escuela no encontrada o inactiva"));
            }
        }
        tracing::debug!(tenant = ?requested, "global admin credential");
        return Ok(AdminContext::school_admin(requested));
    }

    if let Some(id) = &requested {
        if let Some(record) = store.find_active(id).await? {
            let expected = record
                .admin_secret_override
                .as_deref()
                .unwrap_or(&auth.global_admin_secret);

            if record.active && secrets_match(credential, expected) {
                tracing::debug!(tenant = %record.id, "school admin credential");
                return Ok(AdminContext::school_admin(Some(record.id)));
            }
        }
    }

    tracing::warn!(requested_tenant = ?requested, "rejected admin credential");
    Err(AppError::unauthorized("no autorizado"))
}

#[async_trait]
impl FromRequestParts<AppState> for AdminContext {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<AdminContext>() {
            return Ok(ctx.clone());
        }

        let ctx = authenticate_admin(
            &state.config.auth,
            state.tenants.as_ref(),
            &parts.headers,
            &parts.uri,
        )
        .await?;

        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}
