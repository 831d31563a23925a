use serde_json::{Map, Value};

use super::TenantId;

/// Field that carries the owning school on every tenant-scoped record.
pub const TENANT_FIELD: &str = "escuelaId";

/// Equality filter document, keyed by logical field name.
pub type Filter = Map<String, Value>;

/// Tenant context applied to a data query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Scope {
    /// No tenant: every record is visible, including untagged legacy ones.
    #[default]
    Global,
    Tenant(TenantId),
}

impl Scope {
    pub fn tenant(&self) -> Option<&TenantId> {
        match self {
            Scope::Global => None,
            Scope::Tenant(id) => Some(id),
        }
    }

    /// Whether a record owned by `record_tenant` is visible in this scope.
    /// Untagged records stay visible to every tenant.
    pub fn permits(&self, record_tenant: Option<&TenantId>) -> bool {
        match (self, record_tenant) {
            (Scope::Global, _) => true,
            (Scope::Tenant(_), None) => true,
            (Scope::Tenant(scope), Some(owner)) => scope == owner,
        }
    }
}

impl From<Option<TenantId>> for Scope {
    fn from(value: Option<TenantId>) -> Self {
        value.map(Scope::Tenant).unwrap_or(Scope::Global)
    }
}

/// Returns a copy of `query` restricted to `scope`. The caller's filter is
/// never modified; a global scope yields an identical copy.
pub fn scope_query(query: &Filter, scope: &Scope) -> Filter {
    let mut scoped = query.clone();
    if let Scope::Tenant(id) = scope {
        scoped.insert(TENANT_FIELD.to_string(), Value::String(id.to_string()));
    }
    scoped
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tenant() -> TenantId {
        TenantId::parse("64b1f0a2c3d4e5f601234567").unwrap()
    }

    fn filter(value: Value) -> Filter {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn global_scope_returns_query_unchanged() {
        let query = filter(json!({"activo": true}));
        let scoped = scope_query(&query, &Scope::Global);
        assert_eq!(scoped, query);
    }

    #[test]
    fn tenant_scope_adds_equality_and_keeps_clauses() {
        let query = filter(json!({"activo": true, "grupoId": "g1"}));
        let scoped = scope_query(&query, &Scope::Tenant(tenant()));

        assert_eq!(scoped.len(), 3);
        assert_eq!(scoped["activo"], json!(true));
        assert_eq!(scoped["grupoId"], json!("g1"));
        assert_eq!(scoped[TENANT_FIELD], json!("64b1f0a2c3d4e5f601234567"));
    }

    #[test]
    fn scoping_does_not_touch_the_callers_filter() {
        let query = filter(json!({"activo": true}));
        let _ = scope_query(&query, &Scope::Tenant(tenant()));
        assert!(!query.contains_key(TENANT_FIELD));
    }

    #[test]
    fn tenant_scope_overrides_a_foreign_tenant_clause() {
        let mut query = Filter::new();
        query.insert(TENANT_FIELD.to_string(), json!("aaaaaaaaaaaaaaaaaaaaaaaa"));
        let scoped = scope_query(&query, &Scope::Tenant(tenant()));
        assert_eq!(scoped[TENANT_FIELD], json!("64b1f0a2c3d4e5f601234567"));
    }

    #[test]
    fn permits_follows_ownership() {
        let own = tenant();
        let other = TenantId::parse("aaaaaaaaaaaaaaaaaaaaaaaa").unwrap();
        let scope = Scope::Tenant(own.clone());

        assert!(scope.permits(Some(&own)));
        assert!(scope.permits(None));
        assert!(!scope.permits(Some(&other)));
        assert!(Scope::Global.permits(Some(&other)));
    }

    #[test]
    fn scope_from_option() {
        assert_eq!(Scope::from(None), Scope::Global);
        assert_eq!(Scope::from(Some(tenant())), Scope::Tenant(tenant()));
    }
}
