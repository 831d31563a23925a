use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::errors::AppError;
use crate::tenant::TenantId;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Student {
    #[schema(example = "64b1f0a2c3d4e5f601234567")]
    pub id: String,
    /// Owning school; absent on records that predate multi-tenancy.
    #[serde(rename = "escuelaId")]
    #[schema(value_type = Option<String>)]
    pub school_id: Option<TenantId>,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    #[serde(rename = "grupoId")]
    pub group_id: Option<String>,
    #[serde(rename = "activo")]
    pub active: bool,
    #[serde(rename = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DbStudent {
    pub id: String,
    pub school_id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub group_id: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbStudent {
    /// Owning school, if the stored value is a well-formed id.
    pub fn owner(&self) -> Option<TenantId> {
        self.school_id.as_deref().and_then(|id| TenantId::parse(id).ok())
    }
}

impl TryFrom<DbStudent> for Student {
    type Error = AppError;

    fn try_from(value: DbStudent) -> Result<Self, Self::Error> {
        let school_id = value
            .school_id
            .as_deref()
            .map(TenantId::parse)
            .transpose()
            .map_err(|err| AppError::internal(format!("corrupt school id on student: {err}")))?;

        Ok(Student {
            id: value.id,
            school_id,
            name: value.name,
            email: value.email,
            phone: value.phone,
            group_id: value.group_id,
            active: value.active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentCreateRequest {
    #[serde(rename = "nombre")]
    #[schema(example = "Ana López")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "grupoId")]
    pub group_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StudentUpdateRequest {
    #[serde(rename = "nombre")]
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "telefono")]
    pub phone: Option<String>,
    #[serde(rename = "grupoId")]
    pub group_id: Option<String>,
    #[serde(rename = "activo")]
    pub active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListQuery {
    /// Only active (`true`) or inactive (`false`) students
    pub activo: Option<bool>,
    #[serde(rename = "grupoId")]
    pub grupo_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentCreatedResponse {
    pub success: bool,
    pub id: String,
}
