//! Action registry: the account-indexed, in-memory index of action
//! definitions, written through to an `ActionStore`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use kairo_types::action_store::ActionStore;
use kairo_types::action_types::{Action, ActionLog, ActionRequest};
use kairo_types::types::now_after;

use crate::prelude::*;
use crate::store::NoStore;
use crate::validate;

#[derive(Debug, Default)]
struct Index {
	actions: HashMap<Box<str>, Arc<Action>>,
	/// account id ("" for public) -> action ids
	by_account: HashMap<Box<str>, HashSet<Box<str>>>,
}

impl Index {
	fn insert(&mut self, action: Arc<Action>) {
		self.by_account.entry(action.owner_key().into()).or_default().insert(action.id.clone());
		self.actions.insert(action.id.clone(), action);
	}

	fn remove(&mut self, id: &str) -> Option<Arc<Action>> {
		let action = self.actions.remove(id)?;
		if let Some(ids) = self.by_account.get_mut(action.owner_key()) {
			ids.remove(id);
			if ids.is_empty() {
				self.by_account.remove(action.owner_key());
			}
		}
		Some(action)
	}
}

fn check_owner(action: &Action, owner: Option<&str>) -> KrResult<()> {
	match owner {
		Some(owner) if action.owner_key() != owner => Err(Error::PermissionDenied),
		_ => Ok(()),
	}
}

/// Thread-safe action registry.
///
/// One lock guards both indices. Mutations hold it exclusively across the
/// store write, so a failed write leaves the index untouched.
#[derive(Debug)]
pub struct Registry {
	index: RwLock<Index>,
	store: Arc<dyn ActionStore>,
}

impl Registry {
	/// Creates a registry and warms it from `store`.
	///
	/// A store that cannot be read yields an empty registry, not an error.
	pub async fn new(store: Arc<dyn ActionStore>) -> Self {
		let mut index = Index::default();
		match store.list_actions().await {
			Ok(actions) => {
				for action in actions {
					index.insert(Arc::new(action));
				}
				info!("Loaded {} actions from store", index.actions.len());
			}
			Err(err) => {
				warn!("Failed to load actions from store, starting empty: {}", err);
			}
		}
		Self { index: RwLock::new(index), store }
	}

	/// Registry without persistence
	pub fn volatile() -> Self {
		Self { index: RwLock::new(Index::default()), store: Arc::new(NoStore) }
	}

	/// Registers a new action. Ids are never upserted.
	pub async fn register(&self, mut action: Action) -> KrResult<Arc<Action>> {
		validate::check_definition(&action)?;

		let mut index = self.index.write().await;
		if index.actions.contains_key(&action.id) {
			return Err(Error::AlreadyExists);
		}

		let now = now();
		action.created_at = now;
		action.updated_at = now;

		self.store.save_action(&action).await?;

		let action = Arc::new(action);
		index.insert(action.clone());
		Ok(action)
	}

	/// Replaces an existing action. Ownership and creation time are kept
	/// from the registered version whatever the payload says.
	pub async fn update(&self, action: Action) -> KrResult<Arc<Action>> {
		self.update_checked(action, None).await
	}

	/// Like `update`, but only when the registered action belongs to
	/// `account_id` ("" for public actions).
	pub async fn update_owned(&self, account_id: &str, action: Action) -> KrResult<Arc<Action>> {
		self.update_checked(action, Some(account_id)).await
	}

	async fn update_checked(&self, mut action: Action, owner: Option<&str>) -> KrResult<Arc<Action>> {
		if action.id.is_empty() {
			return Err(Error::InvalidAction("id is required".into()));
		}

		let mut index = self.index.write().await;
		let existing = index.actions.get(&action.id).cloned().ok_or(Error::NotFound)?;
		check_owner(&existing, owner)?;

		if action.name.is_empty() {
			action.name = existing.name.clone();
		}
		validate::check_schema(&action.parameters)?;

		action.account_id = existing.account_id.clone();
		action.created_at = existing.created_at;
		action.updated_at = now_after(existing.updated_at);

		self.store.save_action(&action).await?;

		let action = Arc::new(action);
		index.actions.insert(action.id.clone(), action.clone());
		Ok(action)
	}

	pub async fn unregister(&self, id: &str) -> KrResult<()> {
		self.unregister_checked(id, None).await
	}

	/// Like `unregister`, but only when the action belongs to `account_id`
	pub async fn unregister_owned(&self, account_id: &str, id: &str) -> KrResult<()> {
		self.unregister_checked(id, Some(account_id)).await
	}

	async fn unregister_checked(&self, id: &str, owner: Option<&str>) -> KrResult<()> {
		let mut index = self.index.write().await;
		let existing = index.actions.get(id).ok_or(Error::NotFound)?;
		check_owner(existing, owner)?;

		self.store.delete_action(id).await?;

		index.remove(id);
		Ok(())
	}

	pub async fn get(&self, id: &str) -> KrResult<Arc<Action>> {
		self.index.read().await.actions.get(id).cloned().ok_or(Error::NotFound)
	}

	/// Actions owned by `account_id`, in no particular order
	pub async fn get_by_account(&self, account_id: &str) -> Vec<Arc<Action>> {
		let index = self.index.read().await;
		index
			.by_account
			.get(account_id)
			.map(|ids| ids.iter().filter_map(|id| index.actions.get(id).cloned()).collect())
			.unwrap_or_default()
	}

	/// Every registered action regardless of owner
	pub async fn get_all(&self) -> Vec<Arc<Action>> {
		self.index.read().await.actions.values().cloned().collect()
	}

	pub async fn len(&self) -> usize {
		self.index.read().await.actions.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.len().await == 0
	}

	/// Validates an invocation against the registered schema and returns the
	/// matched action.
	pub async fn validate_request(&self, req: &ActionRequest) -> KrResult<Arc<Action>> {
		let action = self.get(&req.action).await?;
		validate::validate_params(&action.parameters, req.parameters.as_ref())?;
		Ok(action)
	}

	/// Appends an audit entry. Returns the id the store assigned.
	pub async fn log_action(&self, log: &ActionLog) -> KrResult<u64> {
		self.store.append_log(log).await
	}

	pub async fn get_action_logs(&self, robot_id: &str, limit: usize) -> KrResult<Vec<ActionLog>> {
		if limit == 0 {
			return Ok(Vec::new());
		}
		self.store.list_logs(robot_id, limit).await
	}
}

// vim: ts=4
