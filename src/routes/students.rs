use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::app::AppState;
use crate::authz::{actions, resources, AdminContext};
use crate::errors::{AppError, AppResult};
use crate::models::student::{
    DbStudent, Student, StudentCreateRequest, StudentCreatedResponse, StudentListQuery,
    StudentUpdateRequest,
};
use crate::models::SuccessResponse;
use crate::query::{bind_param_query_as, compile_filter};
use crate::tenant::{scope_query, Filter, Scope, TENANT_FIELD};
use crate::utils::{new_object_id, non_empty, normalize_object_id, utc_now};

const STUDENT_COLUMNS: &str =
    "id, school_id, name, email, phone, group_id, active, created_at, updated_at";

/// Filter fields accepted on the students collection and their columns.
const STUDENT_FILTER_COLUMNS: &[(&str, &str)] = &[
    ("activo", "active"),
    (TENANT_FIELD, "school_id"),
    ("grupoId", "group_id"),
];

#[utoipa::path(
    get,
    path = "/api/admin/alumnos",
    tag = "Students",
    params(StudentListQuery),
    responses(
        (status = 200, description = "Students visible in the caller's school, sorted by name", body = [Student]),
        (status = 401, description = "No credential matched")
    )
)]
pub async fn list_students(
    State(state): State<AppState>,
    ctx: AdminContext,
    Query(params): Query<StudentListQuery>,
) -> AppResult<Json<Vec<Student>>> {
    ctx.authorize(actions::READ, resources::STUDENTS, state.config.authz_mode)?;

    let mut filter = Filter::new();
    if let Some(active) = params.activo {
        filter.insert("activo".to_string(), Value::Bool(active));
    }
    if let Some(group_id) = non_empty(params.grupo_id.as_deref()) {
        filter.insert("grupoId".to_string(), Value::String(group_id));
    }

    let scoped = scope_query(&filter, &ctx.data_scope());
    let clause = compile_filter(&scoped, STUDENT_FILTER_COLUMNS)?;
    let sql = format!(
        "SELECT {STUDENT_COLUMNS} FROM students{} ORDER BY name ASC",
        clause.sql
    );

    let mut query = sqlx::query_as::<_, DbStudent>(&sql);
    for param in &clause.params {
        query = bind_param_query_as(query, param);
    }
    let rows = query.fetch_all(&state.pool).await?;

    let students = rows
        .into_iter()
        .map(Student::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(students))
}

#[utoipa::path(
    post,
    path = "/api/admin/alumnos",
    tag = "Students",
    request_body = StudentCreateRequest,
    responses(
        (status = 201, description = "Student created in the caller's school", body = StudentCreatedResponse),
        (status = 400, description = "Name is required")
    )
)]
pub async fn create_student(
    State(state): State<AppState>,
    ctx: AdminContext,
    Json(payload): Json<StudentCreateRequest>,
) -> AppResult<(StatusCode, Json<StudentCreatedResponse>)> {
    ctx.authorize(actions::WRITE, resources::STUDENTS, state.config.authz_mode)?;

    let name = non_empty(payload.name.as_deref()).ok_or_else(|| AppError::bad_request("nombre requerido"))?;
    let scope = ctx.data_scope();
    let id = new_object_id();
    let now = utc_now();

    sqlx::query(
        "INSERT INTO students (id, school_id, name, email, phone, group_id, active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(&id)
    .bind(scope.tenant().map(|t| t.as_str()))
    .bind(&name)
    .bind(payload.email.unwrap_or_default())
    .bind(payload.phone.unwrap_or_default())
    .bind(valid_group(payload.group_id.as_deref()))
    .bind(now)
    .bind(now)
    .execute(&state.pool)
    .await?;

    tracing::debug!(student = %id, scope = ?scope, "student created");

    Ok((
        StatusCode::CREATED,
        Json(StudentCreatedResponse { success: true, id }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/admin/alumnos/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student detail", body = Student),
        (status = 404, description = "Student not found in the caller's school")
    )
)]
pub async fn get_student(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<String>,
) -> AppResult<Json<Student>> {
    ctx.authorize(actions::READ, resources::STUDENTS, state.config.authz_mode)?;

    let student = fetch_scoped_student(&state.pool, &id, &ctx.data_scope()).await?;
    Ok(Json(student.try_into()?))
}

#[utoipa::path(
    put,
    path = "/api/admin/alumnos/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    request_body = StudentUpdateRequest,
    responses(
        (status = 200, description = "Student updated", body = SuccessResponse),
        (status = 404, description = "Student not found in the caller's school")
    )
)]
pub async fn update_student(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<String>,
    Json(payload): Json<StudentUpdateRequest>,
) -> AppResult<Json<SuccessResponse>> {
    ctx.authorize(actions::WRITE, resources::STUDENTS, state.config.authz_mode)?;

    let mut student = fetch_scoped_student(&state.pool, &id, &ctx.data_scope()).await?;

    if let Some(name) = non_empty(payload.name.as_deref()) {
        student.name = name;
    }
    if let Some(email) = payload.email {
        student.email = email;
    }
    if let Some(phone) = payload.phone {
        student.phone = phone;
    }
    if payload.group_id.is_some() {
        student.group_id = valid_group(payload.group_id.as_deref());
    }
    if let Some(active) = payload.active {
        student.active = active;
    }

    sqlx::query(
        "UPDATE students SET name = ?, email = ?, phone = ?, group_id = ?, active = ?, updated_at = ? WHERE id = ?",
    )
    .bind(&student.name)
    .bind(&student.email)
    .bind(&student.phone)
    .bind(&student.group_id)
    .bind(student.active)
    .bind(utc_now())
    .bind(&student.id)
    .execute(&state.pool)
    .await?;

    Ok(Json(SuccessResponse::ok()))
}

#[utoipa::path(
    delete,
    path = "/api/admin/alumnos/{id}",
    tag = "Students",
    params(("id" = String, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student deactivated", body = SuccessResponse),
        (status = 404, description = "Student not found in the caller's school")
    )
)]
pub async fn delete_student(
    State(state): State<AppState>,
    ctx: AdminContext,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    ctx.authorize(actions::DELETE, resources::STUDENTS, state.config.authz_mode)?;

    let student = fetch_scoped_student(&state.pool, &id, &ctx.data_scope()).await?;

    sqlx::query("UPDATE students SET active = 0, updated_at = ? WHERE id = ?")
        .bind(utc_now())
        .bind(&student.id)
        .execute(&state.pool)
        .await?;

    Ok(Json(SuccessResponse::ok()))
}

/// Loads a student and hides it unless the scope may see it.
async fn fetch_scoped_student(pool: &SqlitePool, id: &str, scope: &Scope) -> AppResult<DbStudent> {
    let id = normalize_object_id(id).ok_or_else(|| AppError::bad_request("ID inválido"))?;

    let student = sqlx::query_as::<_, DbStudent>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"
    ))
    .bind(&id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::not_found("alumno no encontrado"))?;

    if !scope.permits(student.owner().as_ref()) {
        tracing::warn!(student = %id, scope = ?scope, "cross-school student access");
        return Err(AppError::not_found("alumno no encontrado"));
    }

    Ok(student)
}

fn valid_group(group_id: Option<&str>) -> Option<String> {
    group_id.and_then(normalize_object_id)
}
