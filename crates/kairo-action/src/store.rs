//! Built-in `ActionStore` variants: no persistence at all, and a volatile
//! in-process store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use kairo_types::action_store::ActionStore;
use kairo_types::action_types::{Action, ActionLog};

use crate::prelude::*;

// NoStore //
//*********//
/// Store that persists nothing. Writes succeed, reads come back empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStore;

#[async_trait]
impl ActionStore for NoStore {
	async fn save_action(&self, _action: &Action) -> KrResult<()> {
		Ok(())
	}

	async fn delete_action(&self, _id: &str) -> KrResult<()> {
		Ok(())
	}

	async fn read_action(&self, _id: &str) -> KrResult<Action> {
		Err(Error::NotFound)
	}

	async fn list_actions_by_account(&self, _account_id: &str) -> KrResult<Vec<Action>> {
		Ok(Vec::new())
	}

	async fn list_actions(&self) -> KrResult<Vec<Action>> {
		Ok(Vec::new())
	}

	async fn append_log(&self, _log: &ActionLog) -> KrResult<u64> {
		Ok(0)
	}

	async fn list_logs(&self, _robot_id: &str, _limit: usize) -> KrResult<Vec<ActionLog>> {
		Ok(Vec::new())
	}
}

// MemoryStore //
//*************//
#[derive(Debug, Default)]
struct MemoryInner {
	actions: HashMap<Box<str>, Action>,
	logs: Vec<ActionLog>,
	log_counter: u64,
}

/// Volatile store, lost on restart
#[derive(Debug, Default)]
pub struct MemoryStore {
	inner: RwLock<MemoryInner>,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl ActionStore for MemoryStore {
	async fn save_action(&self, action: &Action) -> KrResult<()> {
		self.inner.write().actions.insert(action.id.clone(), action.clone());
		Ok(())
	}

	async fn delete_action(&self, id: &str) -> KrResult<()> {
		self.inner.write().actions.remove(id);
		Ok(())
	}

	async fn read_action(&self, id: &str) -> KrResult<Action> {
		self.inner.read().actions.get(id).cloned().ok_or(Error::NotFound)
	}

	async fn list_actions_by_account(&self, account_id: &str) -> KrResult<Vec<Action>> {
		let inner = self.inner.read();
		Ok(inner.actions.values().filter(|a| a.owner_key() == account_id).cloned().collect())
	}

	async fn list_actions(&self) -> KrResult<Vec<Action>> {
		Ok(self.inner.read().actions.values().cloned().collect())
	}

	async fn append_log(&self, log: &ActionLog) -> KrResult<u64> {
		let mut inner = self.inner.write();
		inner.log_counter += 1;
		let id = inner.log_counter;
		inner.logs.push(ActionLog { id, ..log.clone() });
		Ok(id)
	}

	async fn list_logs(&self, robot_id: &str, limit: usize) -> KrResult<Vec<ActionLog>> {
		let inner = self.inner.read();
		Ok(inner
			.logs
			.iter()
			.rev()
			.filter(|log| &*log.robot_id == robot_id)
			.take(limit)
			.cloned()
			.collect())
	}
}


// vim: ts=4
