//! Database schema initialization

use sqlx::SqlitePool;

/// Creates the tables and indexes if they do not exist yet
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	// Actions
	//*********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS actions (
		id text NOT NULL,
		name text NOT NULL,
		description text,
		account_id text,
		robot_types json NOT NULL DEFAULT '[]',
		parameters json NOT NULL DEFAULT '{}',
		metadata json,
		webhook_url text,
		created_at integer NOT NULL,
		updated_at integer NOT NULL,
		PRIMARY KEY(id)
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_actions_account ON actions(account_id)")
		.execute(&mut *tx)
		.await?;

	// Audit log
	//***********
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS action_logs (
		id integer PRIMARY KEY AUTOINCREMENT,
		action_id text NOT NULL,
		robot_id text NOT NULL,
		account_id text NOT NULL,
		request_id text,
		parameters json,
		status text NOT NULL,
		response json,
		timestamp integer NOT NULL
	)",
	)
	.execute(&mut *tx)
	.await?;
	sqlx::query("CREATE INDEX IF NOT EXISTS idx_action_logs_robot ON action_logs(robot_id, id)")
		.execute(&mut *tx)
		.await?;

	tx.commit().await?;

	Ok(())
}

// vim: ts=4
