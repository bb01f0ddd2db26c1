//! HTTP API tests
//!
//! Drives the router in-process: authentication, action CRUD with
//! ownership checks, and the robot control endpoints.

use axum::{
	Router,
	body::Body,
	http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use kairo::{AppBuilder, StaticIdentityAdapter, routes};
use kairo_action::MemoryStore;

const ALICE: &str = "key-alice";
const BOB: &str = "key-bob";

async fn create_router() -> Router {
	let identity = StaticIdentityAdapter::new(
		[(ALICE, "acc-alice"), (BOB, "acc-bob")],
		[("robot-a", "acc-alice"), ("robot-b", "acc-bob")],
	);
	let app = AppBuilder::new()
		.action_store(Arc::new(MemoryStore::new()))
		.identity_adapter(Arc::new(identity))
		.build()
		.await
		.expect("Failed to build app");
	routes::init(app)
}

async fn call(
	router: &Router,
	method: Method,
	uri: &str,
	key: Option<&str>,
	body: Option<Value>,
) -> (StatusCode, Value) {
	let mut builder = Request::builder().method(method).uri(uri);
	if let Some(key) = key {
		builder = builder.header("Authorization", format!("Bearer {}", key));
	}
	let req = match body {
		Some(body) => builder
			.header("Content-Type", "application/json")
			.body(Body::from(body.to_string()))
			.expect("request"),
		None => builder.body(Body::empty()).expect("request"),
	};

	let res = router.clone().oneshot(req).await.expect("Router failed");
	let status = res.status();
	let bytes = res.into_body().collect().await.expect("body").to_bytes();
	let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
	(status, json)
}

fn dim_action() -> Value {
	json!({
		"id": "dim",
		"name": "Dim lights",
		"parameters": {
			"level": { "type": "number", "required": true, "min": 1, "max": 5 }
		}
	})
}

#[tokio::test]
async fn test_health_is_public() {
	let router = create_router().await;
	let (status, body) = call(&router, Method::GET, "/health", None, None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_requires_authentication() {
	let router = create_router().await;

	let (status, body) = call(&router, Method::GET, "/api/v1/actions", None, None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);
	assert_eq!(body["success"], false);
	assert_eq!(body["error"]["code"], "E-UNAUTHORIZED");

	let (status, _) = call(&router, Method::GET, "/api/v1/actions", Some("wrong"), None).await;
	assert_eq!(status, StatusCode::UNAUTHORIZED);

	// Raw key without the Bearer prefix
	let req = Request::builder()
		.uri("/api/v1/actions")
		.header("Authorization", ALICE)
		.body(Body::empty())
		.expect("request");
	let res = router.clone().oneshot(req).await.expect("Router failed");
	assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_register_and_list() {
	let router = create_router().await;

	let (status, body) =
		call(&router, Method::POST, "/api/v1/actions", Some(ALICE), Some(dim_action())).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["success"], true);
	assert_eq!(body["data"]["action_id"], "dim");
	assert_eq!(body["data"]["message"], "Action registered successfully");

	let (status, body) =
		call(&router, Method::POST, "/api/v1/actions", Some(BOB), Some(dim_action())).await;
	assert_eq!(status, StatusCode::CONFLICT);
	assert_eq!(body["error"]["code"], "E-CONFLICT");

	let (_, body) = call(&router, Method::GET, "/api/v1/actions", Some(ALICE), None).await;
	assert_eq!(body["data"]["count"], 1);
	assert_eq!(body["data"]["actions"][0]["account_id"], "acc-alice");
	assert_eq!(body["data"]["actions"][0]["parameters"]["level"]["type"], "number");

	let (_, body) = call(&router, Method::GET, "/api/v1/actions", Some(BOB), None).await;
	assert_eq!(body["data"]["count"], 0);

	let (_, body) = call(&router, Method::GET, "/api/v1/actions/all", Some(BOB), None).await;
	assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_register_validation() {
	let router = create_router().await;

	let (status, body) = call(
		&router,
		Method::POST,
		"/api/v1/actions",
		Some(ALICE),
		Some(json!({ "id": "x" })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-VALIDATION");

	let bad_schema = json!({
		"id": "x",
		"name": "X",
		"parameters": { "mode": { "type": "number", "enum": ["a"] } }
	});
	let (status, _) =
		call(&router, Method::POST, "/api/v1/actions", Some(ALICE), Some(bad_schema)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let unknown_type = json!({
		"id": "x",
		"name": "X",
		"parameters": { "when": { "type": "date" } }
	});
	let (status, body) =
		call(&router, Method::POST, "/api/v1/actions", Some(ALICE), Some(unknown_type)).await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["code"], "E-VALIDATION");
}

#[tokio::test]
async fn test_ownership_rules() {
	let router = create_router().await;
	call(&router, Method::POST, "/api/v1/actions", Some(ALICE), Some(dim_action())).await;

	let (status, body) = call(&router, Method::GET, "/api/v1/actions/dim", Some(ALICE), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["name"], "Dim lights");

	let (status, _) = call(&router, Method::GET, "/api/v1/actions/dim", Some(BOB), None).await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) = call(
		&router,
		Method::PUT,
		"/api/v1/actions/dim",
		Some(BOB),
		Some(json!({ "name": "Hijacked" })),
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) = call(&router, Method::DELETE, "/api/v1/actions/dim", Some(BOB), None).await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) =
		call(&router, Method::GET, "/api/v1/actions/missing", Some(ALICE), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete() {
	let router = create_router().await;
	call(&router, Method::POST, "/api/v1/actions", Some(ALICE), Some(dim_action())).await;

	let (status, body) = call(
		&router,
		Method::PUT,
		"/api/v1/actions/dim",
		Some(ALICE),
		Some(json!({ "id": "ignored", "name": "Dim", "account_id": "acc-bob" })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["action_id"], "dim");

	let (_, body) = call(&router, Method::GET, "/api/v1/actions/dim", Some(ALICE), None).await;
	assert_eq!(body["data"]["name"], "Dim");
	assert_eq!(body["data"]["account_id"], "acc-alice");

	let (status, body) =
		call(&router, Method::DELETE, "/api/v1/actions/dim", Some(ALICE), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["message"], "Action deleted successfully");

	let (status, _) = call(&router, Method::DELETE, "/api/v1/actions/dim", Some(ALICE), None).await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_control_and_logs() {
	let router = create_router().await;
	call(&router, Method::POST, "/api/v1/actions", Some(ALICE), Some(dim_action())).await;

	let (status, body) = call(
		&router,
		Method::POST,
		"/api/v1/robots/robot-a/control",
		Some(ALICE),
		Some(json!({ "action": "dim", "parameters": { "level": 3 }, "requestId": "r-1" })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["status"], "received");
	assert_eq!(body["data"]["robot_id"], "robot-a");
	assert_eq!(body["data"]["request_id"], "r-1");

	let (status, body) = call(
		&router,
		Method::POST,
		"/api/v1/robots/robot-a/control",
		Some(ALICE),
		Some(json!({ "action": "dim", "parameters": { "level": "3" } })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["error"]["message"], "parameter level must be a number");

	// Unregistered actions pass through
	let (status, _) = call(
		&router,
		Method::POST,
		"/api/v1/robots/robot-a/control",
		Some(ALICE),
		Some(json!({ "action": "beep" })),
	)
	.await;
	assert_eq!(status, StatusCode::OK);

	let (status, _) = call(
		&router,
		Method::POST,
		"/api/v1/robots/robot-a/control",
		Some(ALICE),
		Some(json!({ "parameters": {} })),
	)
	.await;
	assert_eq!(status, StatusCode::BAD_REQUEST);

	let (status, body) =
		call(&router, Method::GET, "/api/v1/robots/robot-a/control/logs", Some(ALICE), None).await;
	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["data"]["robot_id"], "robot-a");
	assert_eq!(body["data"]["count"], 2);
	assert_eq!(body["data"]["logs"][0]["action_id"], "beep");
	assert_eq!(body["data"]["logs"][1]["action_id"], "dim");

	let (_, body) = call(
		&router,
		Method::GET,
		"/api/v1/robots/robot-a/control/logs?limit=1",
		Some(ALICE),
		None,
	)
	.await;
	assert_eq!(body["data"]["count"], 1);
}

#[tokio::test]
async fn test_control_robot_ownership() {
	let router = create_router().await;
	let req = json!({ "action": "beep" });

	let (status, _) = call(
		&router,
		Method::POST,
		"/api/v1/robots/robot-b/control",
		Some(ALICE),
		Some(req.clone()),
	)
	.await;
	assert_eq!(status, StatusCode::FORBIDDEN);

	let (status, _) =
		call(&router, Method::POST, "/api/v1/robots/robot-x/control", Some(ALICE), Some(req)).await;
	assert_eq!(status, StatusCode::NOT_FOUND);

	let (status, _) =
		call(&router, Method::GET, "/api/v1/robots/robot-b/control/logs", Some(ALICE), None).await;
	assert_eq!(status, StatusCode::FORBIDDEN);
}

// vim: ts=4
