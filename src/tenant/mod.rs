//! Tenant (school) resolution and query scoping.
//!
//! A request names its school through the `X-Escuela-Id` header or the
//! `escuelaId` query parameter. Anything that does not parse as a store id is
//! treated as "no tenant": deployments and records that predate
//! multi-tenancy keep working without a migration.

mod scope;
mod store;

pub use scope::{scope_query, Filter, Scope, TENANT_FIELD};
pub use store::{SqliteTenantStore, TenantRecord, TenantStore};

use std::collections::HashMap;
use std::fmt;

use axum::extract::Query;
use axum::http::{HeaderMap, Uri};
use serde::{Deserialize, Serialize};

pub const TENANT_HEADER: &str = "x-escuela-id";
pub const TENANT_QUERY_PARAM: &str = "escuelaId";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid identifier: expected 24 hex characters, got {0:?}")]
pub struct InvalidIdentifier(pub String);

/// Store identifier of a school: 24 hex characters, kept lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    pub fn parse(raw: &str) -> Result<Self, InvalidIdentifier> {
        crate::utils::normalize_object_id(raw)
            .map(Self)
            .ok_or_else(|| InvalidIdentifier(raw.to_string()))
    }

    pub fn generate() -> Self {
        Self(crate::utils::new_object_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = InvalidIdentifier;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}

/// Picks the tenant named by the request: header first, then query parameter.
/// Malformed candidates fall through to the next source; never fails.
pub fn resolve_tenant_id(headers: &HeaderMap, uri: &Uri) -> Option<TenantId> {
    let from_header = headers
        .get(TENANT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| TenantId::parse(value).ok());

    if from_header.is_some() {
        return from_header;
    }

    Query::<HashMap<String, String>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| params.get(TENANT_QUERY_PARAM).cloned())
        .and_then(|value| TenantId::parse(&value).ok())
}
