//! Invocation dispatch: validate, audit, notify.

use serde::Serialize;
use serde_with::skip_serializing_none;
use std::sync::Arc;

use kairo_types::action_types::{Action, ActionLog, ActionRequest, STATUS_RECEIVED};

use crate::prelude::*;
use crate::registry::Registry;
use crate::webhook::{WebhookPayload, WebhookPool};

/// The authenticated device an invocation comes from
#[derive(Debug, Clone)]
pub struct Invoker {
	pub robot_id: Box<str>,
	pub account_id: Box<str>,
}

/// Acknowledgment returned to the invoking device
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
	pub status: Box<str>,
	pub robot_id: Box<str>,
	pub action: Box<str>,
	pub request_id: Option<Box<str>>,
	pub timestamp: Timestamp,
}

#[derive(Debug)]
pub struct Dispatcher {
	registry: Arc<Registry>,
	webhooks: WebhookPool,
}

impl Dispatcher {
	pub fn new(registry: Arc<Registry>, webhooks: WebhookPool) -> Self {
		Self { registry, webhooks }
	}

	pub fn registry(&self) -> &Arc<Registry> {
		&self.registry
	}

	/// Handles one invocation.
	///
	/// Unregistered actions pass through. Only a schema violation against a
	/// registered action fails the call; audit and webhook problems are
	/// logged and swallowed.
	pub async fn dispatch(&self, invoker: &Invoker, req: ActionRequest) -> KrResult<Receipt> {
		if req.action.is_empty() {
			return Err(Error::InvalidAction("action is required".into()));
		}

		let action: Option<Arc<Action>> = match self.registry.validate_request(&req).await {
			Ok(action) => Some(action),
			Err(Error::NotFound) => {
				warn!(
					"Action {} not registered, passing through for robot {}",
					req.action, invoker.robot_id
				);
				None
			}
			Err(err) => {
				info!("Rejected action {} from robot {}: {}", req.action, invoker.robot_id, err);
				return Err(err);
			}
		};

		let timestamp = now();
		let log = ActionLog {
			id: 0,
			action_id: req.action.clone(),
			robot_id: invoker.robot_id.clone(),
			account_id: invoker.account_id.clone(),
			request_id: req.request_id.clone(),
			parameters: req.parameters.clone(),
			status: STATUS_RECEIVED.into(),
			response: None,
			timestamp,
		};
		if let Err(err) = self.registry.log_action(&log).await {
			warn!("Failed to write action log for {}: {}", req.action, err);
		}

		info!(
			"Robot {} invoked action {} (request: {})",
			invoker.robot_id,
			req.action,
			req.request_id.as_deref().unwrap_or("-")
		);

		if let Some(url) = action.as_deref().and_then(Action::webhook_target) {
			let payload = WebhookPayload {
				robot_id: invoker.robot_id.clone(),
				action: req.action.clone(),
				parameters: req.parameters.clone(),
				request_id: req.request_id.clone(),
				timestamp,
			};
			self.webhooks.submit(url, payload);
		}

		Ok(Receipt {
			status: STATUS_RECEIVED.into(),
			robot_id: invoker.robot_id.clone(),
			action: req.action,
			request_id: req.request_id,
			timestamp,
		})
	}
}

// vim: ts=4
