use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::tenant::TenantId;

pub const DEFAULT_AI_PROVIDER: &str = "claude";
pub const DEFAULT_TIMEZONE: &str = "America/Mexico_City";

/// A school as returned by the API. The admin secret is never part of it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct School {
    #[schema(value_type = String, example = "64b1f0a2c3d4e5f601234567")]
    pub id: TenantId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "activa")]
    pub active: bool,
    #[serde(rename = "configuracion")]
    pub settings: SchoolSettings,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SchoolSettings {
    #[serde(rename = "aiProvider")]
    pub ai_provider: String,
    pub timezone: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbSchool {
    pub id: String,
    pub name: String,
    pub code: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub active: bool,
    pub admin_secret: Option<String>,
    pub ai_provider: String,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<DbSchool> for School {
    type Error = AppError;

    fn try_from(value: DbSchool) -> Result<Self, Self::Error> {
        let id = TenantId::parse(&value.id)
            .map_err(|err| AppError::internal(format!("corrupt school id: {err}")))?;

        Ok(School {
            id,
            name: value.name,
            code: value.code,
            address: value.address,
            phone: value.phone,
            email: value.email,
            active: value.active,
            settings: SchoolSettings {
                ai_provider: value.ai_provider,
                timezone: value.timezone,
            },
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SchoolCreateRequest {
    #[serde(rename = "nombre")]
    #[schema(example = "Colegio Benito Juárez")]
    pub name: Option<String>,
    #[serde(rename = "codigo")]
    #[schema(example = "CBJ-01")]
    pub code: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
    /// Per-school admin secret; generated when omitted.
    #[serde(rename = "adminPassword")]
    pub admin_password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SchoolUpdateRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    #[serde(rename = "codigo")]
    pub code: Option<String>,
    #[serde(rename = "direccion")]
    pub address: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "activa")]
    pub active: Option<bool>,
}

/// Creation result. `adminPassword` is shown once and never again.
#[derive(Debug, Serialize, ToSchema)]
pub struct SchoolCreatedResponse {
    pub success: bool,
    #[schema(value_type = String)]
    pub id: TenantId,
    #[serde(rename = "escuela")]
    pub school: School,
    #[serde(rename = "adminPassword")]
    pub admin_password: String,
}
