//! Authorization module - access guard and permission table
//!
//! This module implements:
//! - Shared-secret authentication with the role derived from which secret matched
//! - Tenant validation for school administrators
//! - A static role -> capability table with wildcard support
//! - Configurable enforcement modes (off/advisory/strict)

mod evaluator;
mod guard;
mod principal;
mod secret;

pub use evaluator::{grants, has_permission};
pub use guard::{authenticate_admin, bearer_credential};
pub use principal::AdminContext;
pub use secret::secrets_match;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authorization enforcement mode for the permission table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthzMode {
    /// No permission checks
    Off,
    /// Log denials but allow requests
    Advisory,
    /// Enforce 403 on denied requests
    Strict,
}

impl FromStr for AuthzMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" => Ok(AuthzMode::Off),
            "advisory" => Ok(AuthzMode::Advisory),
            "strict" => Ok(AuthzMode::Strict),
            other => Err(format!("unknown authz mode: {other}")),
        }
    }
}

/// Roles known to the platform. Only `SuperAdmin` and `SchoolAdmin` are ever
/// produced by the access guard; the others exist in the permission table for
/// the teacher and parent portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    #[serde(rename = "super_admin")]
    SuperAdmin,
    #[serde(rename = "admin_escuela")]
    SchoolAdmin,
    #[serde(rename = "maestro")]
    Teacher,
    #[serde(rename = "padre")]
    Parent,
    #[serde(rename = "guest")]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::SchoolAdmin => "admin_escuela",
            Role::Teacher => "maestro",
            Role::Parent => "padre",
            Role::Guest => "guest",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Well-known actions
pub mod actions {
    pub const READ: &str = "read";
    pub const WRITE: &str = "write";
    pub const DELETE: &str = "delete";
    pub const MANAGE: &str = "manage";
}

/// Well-known resources
pub mod resources {
    pub const SCHOOL: &str = "escuela";
    pub const STUDENTS: &str = "alumnos";
    pub const TEACHERS: &str = "maestros";
    pub const GROUPS: &str = "grupos";
    pub const GRADES: &str = "calificaciones";
    pub const ATTENDANCE: &str = "asistencia";
}
