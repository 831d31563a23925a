use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::AdminContext;
use crate::errors::{AppError, AppResult};
use crate::models::school::{
    DbSchool, School, SchoolCreateRequest, SchoolCreatedResponse, SchoolUpdateRequest,
    DEFAULT_AI_PROVIDER, DEFAULT_TIMEZONE,
};
use crate::models::SuccessResponse;
use crate::tenant::TenantId;
use crate::utils::{generate_secret, non_empty, utc_now};

const SCHOOL_COLUMNS: &str =
    "id, name, code, address, phone, email, active, admin_secret, ai_provider, timezone, created_at, updated_at";

#[utoipa::path(
    get,
    path = "/api/super-admin/escuelas",
    tag = "Schools",
    responses(
        (status = 200, description = "All schools, sorted by name", body = [School]),
        (status = 403, description = "Not a super-admin")
    )
)]
pub async fn list_schools(State(state): State<AppState>, ctx: AdminContext) -> AppResult<Json<Vec<School>>> {
    ctx.require_super_admin()?;

    let rows = sqlx::query_as::<_, DbSchool>(&format!(
        "SELECT {SCHOOL_COLUMNS} FROM schools ORDER BY name ASC"
    ))
    .fetch_all(&state.pool)
    .await?;

    let schools = rows
        .into_iter()
        .map(School::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(schools))
}

#[utoipa::path(
    post,
    path = "/api/super-admin/escuelas",
    tag = "Schools",
    request_body = SchoolCreateRequest,
    responses(
        (status = 201, description = "School created; the admin password is only shown here", body = SchoolCreatedResponse),
        (status = 400, description = "Name and code are required"),
        (status = 403, description = "Not a super-admin"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn create_school(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(payload): Json<SchoolCreateRequest>,
) -> AppResult<(StatusCode, Json<SchoolCreatedResponse>)> {
    ctx.require_super_admin()?;

    let (Some(name), Some(code)) = (
        non_empty(payload.name.as_deref()),
        non_empty(payload.code.as_deref()),
    ) else {
        return Err(AppError::bad_request("nombre y código requeridos"));
    };

    ensure_code_available(&state.pool, &code, None).await?;

    let id = TenantId::generate();
    let admin_password = non_empty(payload.admin_password.as_deref()).unwrap_or_else(generate_secret);
    let now = utc_now();

    sqlx::query(
        "INSERT INTO schools (id, name, code, address, phone, email, active, admin_secret, ai_provider, timezone, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?, ?)",
    )
    .bind(id.as_str())
    .bind(&name)
    .bind(&code)
    .bind(payload.address.unwrap_or_default())
    .bind(payload.phone.unwrap_or_default())
    .bind(payload.email.unwrap_or_default())
    .bind(&admin_password)
    .bind(DEFAULT_AI_PROVIDER)
    .bind(DEFAULT_TIMEZONE)
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await
    .map_err(code_conflict)?;

    let school: School = fetch_school(&state.pool, &id, false).await?.try_into()?;
    tracing::info!(school = %id, code = %school.code, "school created");

    Ok((
        StatusCode::CREATED,
        Json(SchoolCreatedResponse {
            success: true,
            id,
            school,
            admin_password,
        }),
    ))
}

#[utoipa::path(
    put,
    path = "/api/super-admin/escuelas/{id}",
    tag = "Schools",
    params(("id" = String, Path, description = "School id")),
    request_body = SchoolUpdateRequest,
    responses(
        (status = 200, description = "School updated", body = SuccessResponse),
        (status = 400, description = "Malformed id"),
        (status = 403, description = "Not a super-admin"),
        (status = 404, description = "School not found"),
        (status = 409, description = "Code already in use")
    )
)]
pub async fn update_school(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<String>,
    Json(payload): Json<SchoolUpdateRequest>,
) -> AppResult<Json<SuccessResponse>> {
    ctx.require_super_admin()?;

    let id = TenantId::parse(&id).map_err(|_| AppError::bad_request("ID inválido"))?;
    let mut school = fetch_school(&state.pool, &id, false).await?;

    if let Some(name) = non_empty(payload.name.as_deref()) {
        school.name = name;
    }
    if let Some(code) = non_empty(payload.code.as_deref()) {
        ensure_code_available(&state.pool, &code, Some(&id)).await?;
        school.code = code;
    }
    if let Some(address) = payload.address {
        school.address = address;
    }
    if let Some(phone) = payload.phone {
        school.phone = phone;
    }
    if let Some(email) = payload.email {
        school.email = email;
    }
    if let Some(active) = payload.active {
        if school.active && !active {
            tracing::info!(school = %id, "school deactivated");
        }
        school.active = active;
    }

    sqlx::query(
        "UPDATE schools SET name = ?, code = ?, address = ?, phone = ?, email = ?, active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&school.name)
    .bind(&school.code)
    .bind(&school.address)
    .bind(&school.phone)
    .bind(&school.email)
    .bind(school.active)
    .bind(utc_now())
    .bind(id.as_str())
    .execute(&state.pool)
    .await
    .map_err(code_conflict)?;

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    get,
    path = "/api/admin/escuela",
    tag = "Schools",
    params(("X-Escuela-Id" = String, Header, description = "School id")),
    responses(
        (status = 200, description = "The caller's school", body = School),
        (status = 400, description = "No school named by the request"),
        (status = 404, description = "School not found or inactive")
    )
)]
pub async fn current_school(State(state): State<AppState>, ctx: AdminContext) -> AppResult<Json<School>> {
    let scope = ctx.data_scope();
    let id = scope
        .tenant()
        .ok_or_else(|| AppError::bad_request("ID de escuela requerido"))?;

    let school = fetch_school(&state.pool, id, true).await?;
    Ok(Json(school.try_into()?))
}

async fn fetch_school(pool: &SqlitePool, id: &TenantId, active_only: bool) -> AppResult<DbSchool> {
    let sql = if active_only {
        format!("SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = ? AND active = 1")
    } else {
        format!("SELECT {SCHOOL_COLUMNS} FROM schools WHERE id = ?")
    };

    sqlx::query_as::<_, DbSchool>(&sql)
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("escuela no encontrada"))
}

async fn ensure_code_available(pool: &SqlitePool, code: &str, except: Option<&TenantId>) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM schools WHERE code = ? AND id != ?")
        .bind(code)
        .bind(except.map(TenantId::as_str).unwrap_or(""))
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Err(AppError::conflict("el código de escuela ya existe"));
    }

    Ok(())
}

/// A concurrent writer can claim the code between the check and the write.
fn code_conflict(err: sqlx::Error) -> AppError {
    let unique = err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation());

    if unique {
        AppError::conflict("el código de escuela ya existe")
    } else {
        AppError::from(err)
    }
}
