use super::Role;

const WILDCARD: &str = "*";

/// Capabilities granted to each role, as `action:resource` strings.
/// `*` alone grants everything; `action:*` grants the action on any resource.
pub fn grants(role: Role) -> &'static [&'static str] {
    match role {
        Role::SuperAdmin => &[WILDCARD],
        Role::SchoolAdmin => &[
            "read:*",
            "write:*",
            "delete:*",
            "manage:escuela",
            "manage:maestros",
            "manage:alumnos",
            "manage:grupos",
            "manage:calificaciones",
            "manage:asistencia",
        ],
        Role::Teacher => &[
            "read:alumnos",
            "read:grupos",
            "write:calificaciones",
            "write:asistencia",
            "read:calificaciones",
            "read:asistencia",
        ],
        Role::Parent => &[
            "read:alumno_propio",
            "read:calificaciones_propias",
            "read:asistencia_propia",
            "write:citas",
        ],
        Role::Guest => &[],
    }
}

/// Evaluation order:
/// 1. super_admin -> allow, whatever the table says
/// 2. `*` in the role's grants -> allow
/// 3. `action:*` -> allow
/// 4. exact `action:resource` -> allow
/// 5. deny
pub fn has_permission(role: Role, action: &str, resource: &str) -> bool {
    if role == Role::SuperAdmin {
        return true;
    }

    let exact = format!("{action}:{resource}");
    let any_resource = format!("{action}:{WILDCARD}");

    grants(role)
        .iter()
        .any(|grant| *grant == WILDCARD || *grant == any_resource || *grant == exact)
}
