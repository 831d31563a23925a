use async_trait::async_trait;
use sqlx::{FromRow, SqlitePool};

use super::TenantId;
use crate::errors::{AppError, AppResult};

/// The slice of a school record the access guard needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantRecord {
    pub id: TenantId,
    pub active: bool,
    pub admin_secret_override: Option<String>,
}

/// Point-read lookup of schools by id.
#[async_trait]
pub trait TenantStore: Send + Sync {
    /// Returns the school only when it exists and is active.
    async fn find_active(&self, id: &TenantId) -> AppResult<Option<TenantRecord>>;
}

#[derive(Debug, Clone)]
pub struct SqliteTenantStore {
    pool: SqlitePool,
}

impl SqliteTenantStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantRow {
    id: String,
    active: bool,
    admin_secret: Option<String>,
}

#[async_trait]
impl TenantStore for SqliteTenantStore {
    async fn find_active(&self, id: &TenantId) -> AppResult<Option<TenantRecord>> {
        let row = sqlx::query_as::<_, TenantRow>(
            "SELECT id, active, admin_secret FROM schools WHERE id = ? AND active = 1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            let id = TenantId::parse(&row.id)
                .map_err(|err| AppError::internal(format!("corrupt school id: {err}")))?;
            Ok(TenantRecord {
                id,
                active: row.active,
                admin_secret_override: row.admin_secret,
            })
        })
        .transpose()
    }
}
