use serde::Serialize;

use super::{has_permission, AuthzMode, Role};
use crate::errors::{AppError, AppResult};
use crate::tenant::{Scope, TenantId};

/// Outcome of the access guard, attached to every administrative request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminContext {
    pub role: Role,
    /// School the guard validated for this request; always `None` for a super-admin.
    pub tenant_id: Option<TenantId>,
    pub is_super_admin: bool,
    /// School named by the request, validated or not. Lets a super-admin
    /// browse a single school's data.
    #[serde(skip)]
    requested_tenant: Option<TenantId>,
}

impl AdminContext {
    pub fn super_admin() -> Self {
        Self {
            role: Role::SuperAdmin,
            tenant_id: None,
            is_super_admin: true,
            requested_tenant: None,
        }
    }

    pub fn school_admin(tenant_id: Option<TenantId>) -> Self {
        Self {
            role: Role::SchoolAdmin,
            requested_tenant: tenant_id.clone(),
            tenant_id,
            is_super_admin: false,
        }
    }

    pub fn with_requested_tenant(mut self, tenant: Option<TenantId>) -> Self {
        self.requested_tenant = tenant;
        self
    }

    /// Scope for data queries issued on behalf of this request.
    pub fn data_scope(&self) -> Scope {
        match (&self.tenant_id, self.is_super_admin) {
            (Some(id), _) => Scope::Tenant(id.clone()),
            (None, true) => Scope::from(self.requested_tenant.clone()),
            (None, false) => Scope::Global,
        }
    }

    pub fn require_super_admin(&self) -> AppResult<()> {
        if self.is_super_admin {
            Ok(())
        } else {
            Err(AppError::forbidden("solo super administradores pueden acceder"))
        }
    }

    /// Permission-table check, enforced according to `mode`.
    pub fn authorize(&self, action: &str, resource: &str, mode: AuthzMode) -> AppResult<()> {
        if mode == AuthzMode::Off || has_permission(self.role, action, resource) {
            return Ok(());
        }

        match mode {
            AuthzMode::Advisory => {
                tracing::warn!(role = %self.role, action, resource, "permission denied (advisory)");
                Ok(())
            }
            _ => {
                tracing::debug!(role = %self.role, action, resource, "permission denied");
                Err(AppError::forbidden(format!("{action}:{resource} not allowed for {}", self.role)))
            }
        }
    }
}
