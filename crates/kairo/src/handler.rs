//! Action API handlers

use axum::{
	Json,
	extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use kairo_action::{Invoker, Receipt};
use kairo_types::action_types::{Action, ActionLog, ActionRequest};
use kairo_types::types::ApiResponse;

use crate::extract::{Auth, JsonBody};
use crate::prelude::*;

/// Default page size of the control log endpoint
const DEFAULT_LOG_LIMIT: usize = 100;
const MAX_LOG_LIMIT: usize = 1000;

#[derive(Debug, Serialize)]
pub struct ActionList {
	pub actions: Vec<Arc<Action>>,
	pub count: usize,
}

impl From<Vec<Arc<Action>>> for ActionList {
	fn from(actions: Vec<Arc<Action>>) -> Self {
		Self { count: actions.len(), actions }
	}
}

#[derive(Debug, Serialize)]
pub struct LogList {
	pub robot_id: Box<str>,
	pub logs: Vec<ActionLog>,
	pub count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
	pub limit: Option<usize>,
}

fn ack(message: &str, action_id: &str) -> Json<ApiResponse<serde_json::Value>> {
	Json(ApiResponse::new(json!({ "message": message, "action_id": action_id })))
}

/// Fails unless the action belongs to the caller
fn check_owner(action: &Action, account_id: &str) -> KrResult<()> {
	if action.owner_key() == account_id { Ok(()) } else { Err(Error::PermissionDenied) }
}

/// Fails unless the robot is registered under the caller's account
async fn check_robot(app: &App, robot_id: &str, account_id: &str) -> KrResult<()> {
	let owner = app.identity.robot_owner(robot_id).await?;
	if &*owner == account_id { Ok(()) } else { Err(Error::PermissionDenied) }
}

// Actions //
//*********//
/// # POST /api/v1/actions
pub async fn post_action(
	State(app): State<App>,
	Auth(auth): Auth,
	JsonBody(mut action): JsonBody<Action>,
) -> KrResult<Json<ApiResponse<serde_json::Value>>> {
	action.account_id = Some(auth.account_id.clone());
	let action = app.registry.register(action).await?;

	info!("[ACTION] Registered new action: {} (account: {})", action.id, auth.account_id);
	Ok(ack("Action registered successfully", &action.id))
}

/// # GET /api/v1/actions
pub async fn list_actions(
	State(app): State<App>,
	Auth(auth): Auth,
) -> KrResult<Json<ApiResponse<ActionList>>> {
	let actions = app.registry.get_by_account(&auth.account_id).await;
	Ok(Json(ApiResponse::new(actions.into())))
}

/// # GET /api/v1/actions/all
pub async fn list_all_actions(
	State(app): State<App>,
	Auth(_auth): Auth,
) -> KrResult<Json<ApiResponse<ActionList>>> {
	let actions = app.registry.get_all().await;
	Ok(Json(ApiResponse::new(actions.into())))
}

/// # GET /api/v1/actions/{action_id}
pub async fn get_action(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(action_id): Path<String>,
) -> KrResult<Json<ApiResponse<Arc<Action>>>> {
	let action = app.registry.get(&action_id).await?;
	if !action.is_public() {
		check_owner(&action, &auth.account_id)?;
	}
	Ok(Json(ApiResponse::new(action)))
}

/// # PUT /api/v1/actions/{action_id}
pub async fn put_action(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(action_id): Path<String>,
	JsonBody(mut action): JsonBody<Action>,
) -> KrResult<Json<ApiResponse<serde_json::Value>>> {
	action.id = action_id.into();
	let action = app.registry.update_owned(&auth.account_id, action).await?;

	info!("[ACTION] Updated action: {} (account: {})", action.id, auth.account_id);
	Ok(ack("Action updated successfully", &action.id))
}

/// # DELETE /api/v1/actions/{action_id}
pub async fn delete_action(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(action_id): Path<String>,
) -> KrResult<Json<ApiResponse<serde_json::Value>>> {
	app.registry.unregister_owned(&auth.account_id, &action_id).await?;

	info!("[ACTION] Deleted action: {} (account: {})", action_id, auth.account_id);
	Ok(ack("Action deleted successfully", &action_id))
}

// Control //
//*********//
/// # POST /api/v1/robots/{robot_id}/control
pub async fn post_control(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(robot_id): Path<String>,
	JsonBody(req): JsonBody<ActionRequest>,
) -> KrResult<Json<ApiResponse<Receipt>>> {
	check_robot(&app, &robot_id, &auth.account_id).await?;

	let invoker = Invoker { robot_id: robot_id.into(), account_id: auth.account_id };
	let receipt = app.dispatcher.dispatch(&invoker, req).await?;
	Ok(Json(ApiResponse::new(receipt)))
}

/// # GET /api/v1/robots/{robot_id}/control/logs
pub async fn get_control_logs(
	State(app): State<App>,
	Auth(auth): Auth,
	Path(robot_id): Path<String>,
	Query(query): Query<LogQuery>,
) -> KrResult<Json<ApiResponse<LogList>>> {
	check_robot(&app, &robot_id, &auth.account_id).await?;

	let limit = query.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);
	let logs = app.registry.get_action_logs(&robot_id, limit).await?;
	Ok(Json(ApiResponse::new(LogList { robot_id: robot_id.into(), count: logs.len(), logs })))
}

/// # GET /health
pub async fn get_health() -> Json<serde_json::Value> {
	Json(json!({ "status": "ok", "version": crate::VERSION }))
}

// vim: ts=4
