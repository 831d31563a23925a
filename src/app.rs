use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::routes::{health, schools, session, students};
use crate::tenant::{SqliteTenantStore, TenantStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub tenants: Arc<dyn TenantStore>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfig) -> Self {
        let tenants = Arc::new(SqliteTenantStore::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            tenants,
        }
    }
}

pub async fn create_app(pool: SqlitePool) -> Result<Router, AppError> {
    let config = AppConfig::from_env()?;
    Ok(create_app_with_config(pool, config))
}

pub fn create_app_with_config(pool: SqlitePool, config: AppConfig) -> Router {
    tracing::info!(authz_mode = ?config.authz_mode, "building router");
    let state = AppState::new(pool, config);

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_origin(Any)
        .allow_headers(Any);

    let super_admin_routes = Router::new()
        .route("/escuelas", get(schools::list_schools).post(schools::create_school))
        .route("/escuelas/:id", put(schools::update_school));

    let admin_routes = Router::new()
        .route("/login", post(session::login))
        .route("/whoami", get(session::whoami))
        .route("/escuela", get(schools::current_school))
        .route("/alumnos", get(students::list_students).post(students::create_student))
        .route(
            "/alumnos/:id",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        );

    Router::new()
        .route("/api/health", get(health::health))
        .nest("/api/super-admin", super_admin_routes)
        .nest("/api/admin", admin_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
