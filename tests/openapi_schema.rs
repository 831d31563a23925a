use serde_json::Value;

#[test]
fn openapi_documents_admin_surface() -> anyhow::Result<()> {
    // Build the OpenAPI document the same way the server does
    let doc = gestion_escolar::docs::build_openapi(8000)?;
    let v = serde_json::to_value(&doc)?;

    let paths = v
        .get("paths")
        .and_then(Value::as_object)
        .expect("paths must exist");
    for p in [
        "/api/health",
        "/api/admin/whoami",
        "/api/admin/login",
        "/api/admin/escuela",
        "/api/admin/alumnos",
        "/api/admin/alumnos/{id}",
        "/api/super-admin/escuelas",
        "/api/super-admin/escuelas/{id}",
    ] {
        assert!(paths.contains_key(p), "OpenAPI missing path '{}'", p);
    }

    let scheme = &v["components"]["securitySchemes"]["bearerAuth"];
    assert_eq!(scheme["scheme"], "bearer");

    let servers = v["servers"].as_array().expect("servers must exist");
    assert!(servers.iter().any(|s| s["url"] == "http://localhost:8000"));

    Ok(())
}

#[test]
fn school_schema_uses_wire_names_and_hides_secret() -> anyhow::Result<()> {
    let doc = gestion_escolar::docs::build_openapi(8000)?;
    let v = serde_json::to_value(&doc)?;

    let props = v["components"]["schemas"]["School"]["properties"]
        .as_object()
        .expect("components.schemas.School.properties must exist");

    for k in ["id", "nombre", "codigo", "activa", "configuracion"] {
        assert!(props.contains_key(k), "OpenAPI School schema missing '{}'", k);
    }
    assert!(!props.contains_key("admin_secret"));
    assert!(!props.contains_key("adminPassword"));

    Ok(())
}
