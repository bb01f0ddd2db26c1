//! Shared test helpers

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};

use kairo_action::MemoryStore;
use kairo_types::action_store::ActionStore;
use kairo_types::action_types::{Action, ActionLog};
use kairo_types::error::{Error, KrResult};

/// Store that can be switched into failing every write
#[derive(Debug, Default)]
pub struct FlakyStore {
	pub inner: MemoryStore,
	failing: AtomicBool,
}

impl FlakyStore {
	pub fn fail(&self, failing: bool) {
		self.failing.store(failing, Ordering::SeqCst);
	}

	fn check(&self) -> KrResult<()> {
		if self.failing.load(Ordering::SeqCst) { Err(Error::DbError) } else { Ok(()) }
	}
}

#[async_trait]
impl ActionStore for FlakyStore {
	async fn save_action(&self, action: &Action) -> KrResult<()> {
		self.check()?;
		self.inner.save_action(action).await
	}

	async fn delete_action(&self, id: &str) -> KrResult<()> {
		self.check()?;
		self.inner.delete_action(id).await
	}

	async fn read_action(&self, id: &str) -> KrResult<Action> {
		self.check()?;
		self.inner.read_action(id).await
	}

	async fn list_actions_by_account(&self, account_id: &str) -> KrResult<Vec<Action>> {
		self.check()?;
		self.inner.list_actions_by_account(account_id).await
	}

	async fn list_actions(&self) -> KrResult<Vec<Action>> {
		self.check()?;
		self.inner.list_actions().await
	}

	async fn append_log(&self, log: &ActionLog) -> KrResult<u64> {
		self.check()?;
		self.inner.append_log(log).await
	}

	async fn list_logs(&self, robot_id: &str, limit: usize) -> KrResult<Vec<ActionLog>> {
		self.check()?;
		self.inner.list_logs(robot_id, limit).await
	}
}

// vim: ts=4
