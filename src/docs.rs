use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::{json, Map, Value};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::models;
use crate::routes;

#[derive(OpenApi)]
#[openapi(
	paths(
		routes::health::health,
		routes::session::login,
		routes::session::whoami,
		routes::schools::list_schools,
		routes::schools::create_school,
		routes::schools::update_school,
		routes::schools::current_school,
		routes::students::list_students,
		routes::students::create_student,
		routes::students::get_student,
		routes::students::update_student,
		routes::students::delete_student
	),
	components(
		schemas(
			models::SuccessResponse,
			models::school::School,
			models::school::SchoolSettings,
			models::school::SchoolCreateRequest,
			models::school::SchoolUpdateRequest,
			models::school::SchoolCreatedResponse,
			models::student::Student,
			models::student::StudentCreateRequest,
			models::student::StudentUpdateRequest,
			models::student::StudentCreatedResponse,
			routes::health::HealthResponse,
			routes::session::SessionResponse,
			routes::session::LoginRequest,
			routes::session::LoginResponse,
			crate::authz::Role
		)
	),
	tags(
		(name = "Health", description = "Liveness and database check"),
		(name = "Session", description = "Role and school resolved for the caller"),
		(name = "Schools", description = "School (tenant) administration"),
		(name = "Students", description = "School-scoped student records")
	)
)]
pub struct ApiDoc;

pub fn build_openapi(port: u16) -> anyhow::Result<utoipa::openapi::OpenApi> {
	let mut doc = serde_json::to_value(&ApiDoc::openapi())?;

	ensure_security_components(&mut doc);
	ensure_global_security(&mut doc);
	ensure_openapi_version(&mut doc);
	ensure_servers(&mut doc, port);

	Ok(serde_json::from_value(doc)?)
}

pub fn swagger_routes(doc: utoipa::openapi::OpenApi) -> anyhow::Result<Router> {
	let swagger_config = utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
		.try_it_out_enabled(true)
		.with_credentials(true)
		.persist_authorization(true);

	let doc_json = Arc::new(serde_json::to_value(&doc)?);

	let json_route = {
		let doc_json = Arc::clone(&doc_json);
		get(move || {
			let doc_json = Arc::clone(&doc_json);
			async move { Json((*doc_json).clone()) }
		})
	};

	Ok(Router::new()
		.route("/api-docs/openapi.json", json_route)
		.merge(SwaggerUi::new("/docs").config(swagger_config)))
}

fn object_entry<'a>(doc: &'a mut Value, key: &str) -> Option<&'a mut Map<String, Value>> {
	doc.as_object_mut()?
		.entry(key)
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
}

fn ensure_security_components(doc: &mut Value) {
	let Some(components) = object_entry(doc, "components") else { return; };

	let Some(schemes) = components
		.entry("securitySchemes")
		.or_insert_with(|| Value::Object(Map::new()))
		.as_object_mut()
	else {
		return;
	};

	// Credentials are pre-shared secrets, not signed tokens.
	schemes.insert(
		"bearerAuth".to_string(),
		json!({
			"type": "http",
			"scheme": "bearer",
			"description": "Super-admin secret, global admin secret, or the school's own admin secret"
		}),
	);
}

fn ensure_global_security(doc: &mut Value) {
	if let Some(root) = doc.as_object_mut() {
		root.entry("security")
			.or_insert_with(|| json!([{ "bearerAuth": [] }]));
	}
}

fn ensure_openapi_version(doc: &mut Value) {
	if let Some(root) = doc.as_object_mut() {
		root.entry("openapi")
			.or_insert_with(|| Value::String("3.1.0".to_string()));
	}
}

fn ensure_servers(doc: &mut Value, port: u16) {
	let server_url = format!("http://localhost:{}", port);

	match doc.get_mut("servers") {
		Some(Value::Array(arr)) => {
			let has = arr.iter().any(|v| v.get("url").and_then(Value::as_str) == Some(server_url.as_str()));
			if !has {
				arr.push(json!({ "url": server_url }));
			}
		}
		_ => {
			doc["servers"] = json!([{ "url": server_url }]);
		}
	}
}
