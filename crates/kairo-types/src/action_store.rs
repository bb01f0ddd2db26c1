//! Persistence contract for action definitions and the invocation audit trail.
//!
//! The registry writes through to an `ActionStore` on every mutation and
//! reads from it only once, at startup. Implementations must be safe to call
//! from many tasks at once.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::action_types::{Action, ActionLog};
use crate::prelude::*;

#[async_trait]
pub trait ActionStore: Debug + Send + Sync {
	/// # Actions
	/// Inserts or replaces the action with the same id
	async fn save_action(&self, action: &Action) -> KrResult<()>;
	/// Deleting a missing id is not an error
	async fn delete_action(&self, id: &str) -> KrResult<()>;
	async fn read_action(&self, id: &str) -> KrResult<Action>;
	async fn list_actions_by_account(&self, account_id: &str) -> KrResult<Vec<Action>>;
	async fn list_actions(&self) -> KrResult<Vec<Action>>;

	/// # Audit log
	/// Appends a log entry and returns the id assigned to it
	async fn append_log(&self, log: &ActionLog) -> KrResult<u64>;
	/// Returns at most `limit` entries for a robot, most recent first
	async fn list_logs(&self, robot_id: &str, limit: usize) -> KrResult<Vec<ActionLog>>;
}

// vim: ts=4
