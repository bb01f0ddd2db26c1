//! SQLite-backed `ActionStore`.
//!
//! Action definitions live in the `actions` table with their schema and
//! metadata as JSON columns. The audit trail goes to `action_logs`, whose
//! autoincrement id is the log id handed back to the registry. Timestamps
//! are stored as microseconds since the epoch.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod schema;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use sqlx::{
	Row,
	sqlite::{self, SqlitePool, SqliteRow},
};
use std::path::Path;

use kairo_types::action_store::ActionStore;
use kairo_types::action_types::{Action, ActionLog};
use kairo_types::prelude::*;

use crate::schema::init_db;

// Helper functions
//******************
fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

fn db_err(err: sqlx::Error) -> Error {
	match err {
		sqlx::Error::RowNotFound => Error::NotFound,
		err => {
			inspect(&err);
			Error::DbError
		}
	}
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> KrResult<String> {
	serde_json::to_string(value).map_err(|e| {
		warn!("DB: cannot encode JSON column: {}", e);
		Error::DbError
	})
}

fn opt_to_json<T: Serialize>(value: Option<&T>) -> KrResult<Option<String>> {
	value.map(to_json).transpose()
}

fn from_json<T: DeserializeOwned>(text: &str) -> KrResult<T> {
	serde_json::from_str(text).map_err(|e| {
		warn!("DB: cannot decode JSON column: {}", e);
		Error::DbError
	})
}

fn opt_from_json<T: DeserializeOwned>(text: Option<String>) -> KrResult<Option<T>> {
	text.as_deref().map(from_json).transpose()
}

fn to_micros(ts: Timestamp) -> i64 {
	ts.timestamp_micros()
}

fn from_micros(us: i64) -> KrResult<Timestamp> {
	chrono::DateTime::from_timestamp_micros(us).ok_or(Error::DbError)
}

fn get<'r, T>(row: &'r SqliteRow, column: &str) -> KrResult<T>
where
	T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
	row.try_get(column).map_err(db_err)
}

fn get_str(row: &SqliteRow, column: &str) -> KrResult<Box<str>> {
	get::<String>(row, column).map(Into::into)
}

fn get_opt_str(row: &SqliteRow, column: &str) -> KrResult<Option<Box<str>>> {
	get::<Option<String>>(row, column).map(|s| s.map(Into::into))
}

fn read_action(row: &SqliteRow) -> KrResult<Action> {
	Ok(Action {
		id: get_str(row, "id")?,
		name: get_str(row, "name")?,
		description: get_opt_str(row, "description")?,
		account_id: get_opt_str(row, "account_id")?,
		robot_types: from_json(&get::<String>(row, "robot_types")?)?,
		parameters: from_json(&get::<String>(row, "parameters")?)?,
		metadata: opt_from_json(get(row, "metadata")?)?,
		webhook_url: get_opt_str(row, "webhook_url")?,
		created_at: from_micros(get(row, "created_at")?)?,
		updated_at: from_micros(get(row, "updated_at")?)?,
	})
}

fn read_log(row: &SqliteRow) -> KrResult<ActionLog> {
	Ok(ActionLog {
		id: u64::try_from(get::<i64>(row, "id")?).map_err(|_| Error::DbError)?,
		action_id: get_str(row, "action_id")?,
		robot_id: get_str(row, "robot_id")?,
		account_id: get_str(row, "account_id")?,
		request_id: get_opt_str(row, "request_id")?,
		parameters: opt_from_json(get(row, "parameters")?)?,
		status: get_str(row, "status")?,
		response: opt_from_json(get(row, "response")?)?,
		timestamp: from_micros(get(row, "timestamp")?)?,
	})
}

const ACTION_COLUMNS: &str = "id, name, description, account_id, robot_types, parameters, metadata, webhook_url, created_at, updated_at";

#[derive(Debug)]
pub struct SqliteActionStore {
	db: SqlitePool,
}

impl SqliteActionStore {
	/// Opens (or creates) the database at `path` and makes sure the schema exists
	pub async fn new(path: impl AsRef<Path>) -> KrResult<Self> {
		let path = path.as_ref();
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(parent).await?;
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path)
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;

		init_db(&db).await.inspect_err(inspect).or(Err(Error::DbError))?;
		info!("Opened action store at {}", path.display());

		Ok(Self { db })
	}
}

#[async_trait]
impl ActionStore for SqliteActionStore {
	// Actions
	//*********
	async fn save_action(&self, action: &Action) -> KrResult<()> {
		sqlx::query(
			"INSERT INTO actions (id, name, description, account_id, robot_types, parameters,
				metadata, webhook_url, created_at, updated_at)
			VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
			ON CONFLICT(id) DO UPDATE SET
				name = excluded.name,
				description = excluded.description,
				account_id = excluded.account_id,
				robot_types = excluded.robot_types,
				parameters = excluded.parameters,
				metadata = excluded.metadata,
				webhook_url = excluded.webhook_url,
				created_at = excluded.created_at,
				updated_at = excluded.updated_at",
		)
		.bind(&*action.id)
		.bind(&*action.name)
		.bind(action.description.as_deref())
		.bind(action.account_id.as_deref())
		.bind(to_json(&action.robot_types)?)
		.bind(to_json(&action.parameters)?)
		.bind(opt_to_json(action.metadata.as_ref())?)
		.bind(action.webhook_url.as_deref())
		.bind(to_micros(action.created_at))
		.bind(to_micros(action.updated_at))
		.execute(&self.db)
		.await
		.map_err(db_err)?;

		Ok(())
	}

	async fn delete_action(&self, id: &str) -> KrResult<()> {
		sqlx::query("DELETE FROM actions WHERE id = ?1")
			.bind(id)
			.execute(&self.db)
			.await
			.map_err(db_err)?;
		Ok(())
	}

	async fn read_action(&self, id: &str) -> KrResult<Action> {
		let row = sqlx::query(&format!("SELECT {} FROM actions WHERE id = ?1", ACTION_COLUMNS))
			.bind(id)
			.fetch_one(&self.db)
			.await
			.map_err(db_err)?;
		read_action(&row)
	}

	async fn list_actions_by_account(&self, account_id: &str) -> KrResult<Vec<Action>> {
		let rows = sqlx::query(&format!(
			"SELECT {} FROM actions WHERE coalesce(account_id, '') = ?1 ORDER BY id",
			ACTION_COLUMNS
		))
		.bind(account_id)
		.fetch_all(&self.db)
		.await
		.map_err(db_err)?;
		rows.iter().map(read_action).collect()
	}

	async fn list_actions(&self) -> KrResult<Vec<Action>> {
		let rows = sqlx::query(&format!("SELECT {} FROM actions ORDER BY id", ACTION_COLUMNS))
			.fetch_all(&self.db)
			.await
			.map_err(db_err)?;
		rows.iter().map(read_action).collect()
	}

	// Audit log
	//***********
	async fn append_log(&self, log: &ActionLog) -> KrResult<u64> {
		let res = sqlx::query(
			"INSERT INTO action_logs (action_id, robot_id, account_id, request_id, parameters,
				status, response, timestamp)
			VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
		)
		.bind(&*log.action_id)
		.bind(&*log.robot_id)
		.bind(&*log.account_id)
		.bind(log.request_id.as_deref())
		.bind(opt_to_json(log.parameters.as_ref())?)
		.bind(&*log.status)
		.bind(opt_to_json(log.response.as_ref())?)
		.bind(to_micros(log.timestamp))
		.execute(&self.db)
		.await
		.map_err(db_err)?;

		u64::try_from(res.last_insert_rowid()).map_err(|_| Error::DbError)
	}

	async fn list_logs(&self, robot_id: &str, limit: usize) -> KrResult<Vec<ActionLog>> {
		let rows = sqlx::query(
			"SELECT id, action_id, robot_id, account_id, request_id, parameters, status, response,
				timestamp
			FROM action_logs WHERE robot_id = ?1 ORDER BY id DESC LIMIT ?2",
		)
		.bind(robot_id)
		.bind(i64::try_from(limit).unwrap_or(i64::MAX))
		.fetch_all(&self.db)
		.await
		.map_err(db_err)?;
		rows.iter().map(read_log).collect()
	}
}

// vim: ts=4
