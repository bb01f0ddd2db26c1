//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `level`.
///
/// Calling it again is harmless: only the first subscriber is kept.
pub fn init(level: &str) {
	let filter = EnvFilter::try_from_default_env()
		.or_else(|_| EnvFilter::try_new(level))
		.unwrap_or_else(|_| EnvFilter::new("info"));

	let res = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
	if res.is_err() {
		tracing::debug!("Tracing subscriber already installed");
	}
}

// vim: ts=4
