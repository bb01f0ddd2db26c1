//! KairoIO action service

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

use kairo::config::StoreKind;
use kairo::{AppBuilder, Config, logging};
use kairo_action::{MemoryStore, NoStore};
use kairo_action_adapter_sqlite::SqliteActionStore;
use kairo_types::action_store::ActionStore;
use kairo_types::error::KrResult;

#[derive(Debug, Parser)]
#[command(name = "kairo", version, about = "KairoIO action service")]
struct Args {
	/// YAML config file. KAIRO_* environment variables override it.
	#[arg(short, long, value_name = "FILE")]
	config: Option<PathBuf>,
}

async fn open_store(config: &Config) -> KrResult<Arc<dyn ActionStore>> {
	let store: Arc<dyn ActionStore> = match config.store.kind {
		StoreKind::None => Arc::new(NoStore),
		StoreKind::Memory => Arc::new(MemoryStore::new()),
		StoreKind::Sqlite => Arc::new(SqliteActionStore::new(&config.store.path).await?),
	};
	Ok(store)
}

async fn run(config: Config) -> KrResult<()> {
	let store = open_store(&config).await?;
	info!("Using {:?} action store", config.store.kind);

	let mut builder = AppBuilder::new();
	builder
		.listen(config.server.listen.as_str())
		.webhook(config.webhook_opts())
		.action_store(store)
		.identity_adapter(Arc::new(config.identity_adapter()));
	builder.run().await
}

#[tokio::main]
async fn main() -> ExitCode {
	let args = Args::parse();

	let config = match Config::load(args.config.as_deref()) {
		Ok(config) => config,
		Err(e) => {
			eprintln!("kairo: {}", e);
			return ExitCode::FAILURE;
		}
	};
	logging::init(&config.log.level);

	match run(config).await {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			error!("FATAL: {}", e);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
