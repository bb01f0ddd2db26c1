//! Router setup

use axum::{
	Router,
	http::Method,
	middleware,
	routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handler;
use crate::middleware::require_auth;
use crate::prelude::*;

fn init_api(app: App) -> Router<App> {
	Router::new()
		.route("/api/v1/actions", post(handler::post_action).get(handler::list_actions))
		.route("/api/v1/actions/all", get(handler::list_all_actions))
		.route(
			"/api/v1/actions/{action_id}",
			get(handler::get_action).put(handler::put_action).delete(handler::delete_action),
		)
		.route("/api/v1/robots/{robot_id}/control", post(handler::post_control))
		.route("/api/v1/robots/{robot_id}/control/logs", get(handler::get_control_logs))
		.route_layer(middleware::from_fn_with_state(app, require_auth))
}

pub fn init(app: App) -> Router {
	let cors = CorsLayer::new()
		.allow_origin(Any)
		.allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
		.allow_headers(Any);

	Router::new()
		.route("/health", get(handler::get_health))
		.merge(init_api(app.clone()))
		.layer(cors)
		.layer(TraceLayer::new_for_http())
		.with_state(app)
}

// vim: ts=4
