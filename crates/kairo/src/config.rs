//! Service configuration.
//!
//! Every field has a default. A YAML file may override any subset of them,
//! and `KAIRO_*` environment variables override the file.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use kairo_action::WebhookOpts;

use crate::identity::StaticIdentityAdapter;
use crate::prelude::*;

pub const ENV_PREFIX: &str = "KAIRO_";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub server: ServerConfig,
	pub store: StoreConfig,
	pub webhook: WebhookConfig,
	pub log: LogConfig,
	pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
	pub listen: String,
}

impl Default for ServerConfig {
	fn default() -> Self {
		Self { listen: "0.0.0.0:8080".into() }
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
	/// Nothing is persisted
	None,
	Memory,
	Sqlite,
}

impl FromStr for StoreKind {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" => Ok(StoreKind::None),
			"memory" => Ok(StoreKind::Memory),
			"sqlite" => Ok(StoreKind::Sqlite),
			_ => Err(Error::ConfigError(format!("unknown store kind: {}", s))),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
	pub kind: StoreKind,
	/// Database file, used by the sqlite store
	pub path: PathBuf,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self { kind: StoreKind::Sqlite, path: PathBuf::from("./data/kairo.db") }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WebhookConfig {
	pub workers: usize,
	pub queue_size: usize,
	pub timeout_secs: u64,
}

impl Default for WebhookConfig {
	fn default() -> Self {
		Self { workers: 4, queue_size: 256, timeout_secs: 10 }
	}
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
	/// Default filter directive, `RUST_LOG` takes precedence
	pub level: String,
}

impl Default for LogConfig {
	fn default() -> Self {
		Self { level: "info".into() }
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
	/// certification key -> account id
	pub cert_keys: HashMap<String, String>,
	/// robot id -> account id
	pub robots: HashMap<String, String>,
}

fn parse_num<T: FromStr>(key: &str, value: &str) -> KrResult<T> {
	value.trim().parse().map_err(|_| Error::ConfigError(format!("invalid value for {}: {}", key, value)))
}

impl Config {
	/// Loads the config file (if any) and applies the process environment
	pub fn load(path: Option<&Path>) -> KrResult<Self> {
		let mut config = match path {
			Some(path) => {
				let text = std::fs::read_to_string(path).map_err(|e| {
					Error::ConfigError(format!("cannot read {}: {}", path.display(), e))
				})?;
				Self::from_yaml(&text)?
			}
			None => Self::default(),
		};
		config.apply_env(std::env::vars())?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_yaml(text: &str) -> KrResult<Self> {
		// An empty document means "all defaults"
		if text.trim().is_empty() {
			return Ok(Self::default());
		}
		serde_yaml::from_str(text).map_err(|e| Error::ConfigError(e.to_string()))
	}

	/// Applies `KAIRO_*` overrides. Unrelated variables are ignored.
	pub fn apply_env(
		&mut self,
		vars: impl IntoIterator<Item = (String, String)>,
	) -> KrResult<()> {
		for (key, value) in vars {
			let Some(name) = key.strip_prefix(ENV_PREFIX) else { continue };
			match name {
				"LISTEN" => self.server.listen = value,
				"STORE" => self.store.kind = value.trim().parse()?,
				"DB_PATH" => self.store.path = PathBuf::from(value),
				"LOG" => self.log.level = value,
				"WEBHOOK_WORKERS" => self.webhook.workers = parse_num(&key, &value)?,
				"WEBHOOK_QUEUE" => self.webhook.queue_size = parse_num(&key, &value)?,
				"WEBHOOK_TIMEOUT" => self.webhook.timeout_secs = parse_num(&key, &value)?,
				_ => {}
			}
		}
		Ok(())
	}

	pub fn validate(&self) -> KrResult<()> {
		if self.server.listen.trim().is_empty() {
			return Err(Error::ConfigError("server.listen must not be empty".into()));
		}
		if self.webhook.workers == 0 {
			return Err(Error::ConfigError("webhook.workers must be positive".into()));
		}
		if self.webhook.timeout_secs == 0 {
			return Err(Error::ConfigError("webhook.timeout_secs must be positive".into()));
		}
		if self.store.kind == StoreKind::Sqlite && self.store.path.as_os_str().is_empty() {
			return Err(Error::ConfigError("store.path is required for the sqlite store".into()));
		}
		Ok(())
	}

	pub fn webhook_opts(&self) -> WebhookOpts {
		WebhookOpts {
			workers: self.webhook.workers,
			queue_size: self.webhook.queue_size,
			timeout: Duration::from_secs(self.webhook.timeout_secs),
		}
	}

	pub fn identity_adapter(&self) -> StaticIdentityAdapter {
		StaticIdentityAdapter::new(
			self.auth.cert_keys.iter().map(|(k, v)| (k.as_str(), v.as_str())),
			self.auth.robots.iter().map(|(k, v)| (k.as_str(), v.as_str())),
		)
	}
}


// vim: ts=4
