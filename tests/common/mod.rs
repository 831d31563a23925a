#![allow(dead_code)]

use std::path::Path;

use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use tempfile::{tempdir, TempDir};
use tower::util::ServiceExt; // for `oneshot`

use gestion_escolar::config::AppConfig;
use gestion_escolar::create_app_with_config;
use gestion_escolar::tenant::TenantId;
use gestion_escolar::utils::{new_object_id, utc_now};

pub const SUPER_SECRET: &str = "root-secret";
pub const GLOBAL_SECRET: &str = "school-secret";

pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
    // keeps the database file alive for the duration of the test
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        Self::with_config(AppConfig::new(SUPER_SECRET, GLOBAL_SECRET)).await
    }

    pub async fn with_config(config: AppConfig) -> Result<Self> {
        let dir = tempdir()?;
        let db_path = dir.path().join("test.db");

        let opts = SqliteConnectOptions::new()
            .filename(db_path.as_path())
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(opts).await?;

        let migrator = sqlx::migrate::Migrator::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations")).await?;
        migrator.run(&pool).await?;

        let app = create_app_with_config(pool.clone(), config);

        Ok(Self { app, pool, _dir: dir })
    }

    /// Sends a request and returns the status and the parsed JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        secret: Option<&str>,
        school: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(secret) = secret {
            builder = builder.header("authorization", format!("Bearer {}", secret));
        }
        if let Some(school) = school {
            builder = builder.header("x-escuela-id", school);
        }

        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };

        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }

    pub async fn insert_school(&self, code: &str, active: bool, admin_secret: Option<&str>) -> Result<TenantId> {
        let id = TenantId::generate();
        let now = utc_now();
        sqlx::query(
            "INSERT INTO schools (id, name, code, address, phone, email, active, admin_secret, created_at, updated_at) VALUES (?, ?, ?, '', '', '', ?, ?, ?, ?)",
        )
        .bind(id.as_str())
        .bind(format!("Escuela {}", code))
        .bind(code)
        .bind(active)
        .bind(admin_secret)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    /// Inserts a student row directly; `school` = `None` models a pre-tenancy record.
    pub async fn insert_student(&self, school: Option<&TenantId>, name: &str, active: bool) -> Result<String> {
        let id = new_object_id();
        let now = utc_now();
        sqlx::query(
            "INSERT INTO students (id, school_id, name, email, phone, group_id, active, created_at, updated_at) VALUES (?, ?, ?, '', '', NULL, ?, ?, ?)",
        )
        .bind(&id)
        .bind(school.map(TenantId::as_str))
        .bind(name)
        .bind(active)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}

pub fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("nombre").and_then(Value::as_str).map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
