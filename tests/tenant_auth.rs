mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{TestApp, GLOBAL_SECRET, SUPER_SECRET};

const WHOAMI: &str = "/api/admin/whoami";

#[tokio::test]
async fn missing_credential_is_unauthorized() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", true, None).await?;

    let (status, body) = t.send("GET", WHOAMI, None, Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    Ok(())
}

#[tokio::test]
async fn unknown_credential_is_unauthorized() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", true, None).await?;

    let (status, _) = t.send("GET", WHOAMI, Some("wrong"), Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = t.send("GET", WHOAMI, Some("wrong"), None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn super_admin_is_global_even_when_school_named() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", true, None).await?;

    let (status, body) = t.send("GET", WHOAMI, Some(SUPER_SECRET), Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "role": "super_admin", "tenantId": null, "isSuperAdmin": true })
    );

    Ok(())
}

#[tokio::test]
async fn global_secret_with_active_school_binds_tenant() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", true, None).await?;

    let (status, body) = t.send("GET", WHOAMI, Some(GLOBAL_SECRET), Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin_escuela");
    assert_eq!(body["tenantId"], school.as_str());
    assert_eq!(body["isSuperAdmin"], false);

    Ok(())
}

#[tokio::test]
async fn school_named_by_query_parameter() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", true, None).await?;

    let uri = format!("{}?escuelaId={}", WHOAMI, school);
    let (status, body) = t.send("GET", &uri, Some(GLOBAL_SECRET), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenantId"], school.as_str());

    Ok(())
}

#[tokio::test]
async fn global_secret_with_inactive_school_is_not_found() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", false, None).await?;

    let (status, body) = t.send("GET", WHOAMI, Some(GLOBAL_SECRET), Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "tenant_not_found");

    Ok(())
}

#[tokio::test]
async fn global_secret_with_unknown_school_is_not_found() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, _) = t
        .send("GET", WHOAMI, Some(GLOBAL_SECRET), Some("64b1f0a2c3d4e5f601234567"), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn global_secret_without_school_has_no_tenant() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, body) = t.send("GET", WHOAMI, Some(GLOBAL_SECRET), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin_escuela");
    assert_eq!(body["tenantId"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn malformed_school_id_is_ignored() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, body) = t.send("GET", WHOAMI, Some(GLOBAL_SECRET), Some("not-an-id"), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenantId"], Value::Null);

    Ok(())
}

#[tokio::test]
async fn school_override_secret_authenticates_only_for_that_school() -> Result<()> {
    let t = TestApp::spawn().await?;
    let own = t.insert_school("A1", true, Some("own-secret")).await?;
    let other = t.insert_school("B1", true, Some("other-secret")).await?;

    let (status, body) = t.send("GET", WHOAMI, Some("own-secret"), Some(own.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tenantId"], own.as_str());

    let (status, _) = t.send("GET", WHOAMI, Some("own-secret"), Some(other.as_str()), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // an override secret is meaningless without a school
    let (status, _) = t.send("GET", WHOAMI, Some("own-secret"), None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn override_secret_of_inactive_school_is_rejected() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", false, Some("own-secret")).await?;

    let (status, _) = t.send("GET", WHOAMI, Some("own-secret"), Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn login_returns_admin_token_for_correct_password() -> Result<()> {
    let t = TestApp::spawn().await?;
    let school = t.insert_school("A1", true, None).await?;

    let (status, body) = t
        .send("POST", "/api/admin/login", None, None, Some(json!({ "password": GLOBAL_SECRET })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let token = body["token"].as_str().unwrap_or_default().to_string();

    // the token works as the bearer credential
    let (status, whoami) = t.send("GET", WHOAMI, Some(&token), Some(school.as_str()), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(whoami["role"], "admin_escuela");

    Ok(())
}

#[tokio::test]
async fn login_rejects_wrong_or_missing_password() -> Result<()> {
    let t = TestApp::spawn().await?;

    let (status, body) = t
        .send("POST", "/api/admin/login", None, None, Some(json!({ "password": "nope" })))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let (status, _) = t.send("POST", "/api/admin/login", None, None, Some(json!({}))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // the super-admin secret is not an admin login password
    let (status, _) = t
        .send("POST", "/api/admin/login", None, None, Some(json!({ "password": SUPER_SECRET })))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    Ok(())
}
