//! App state and builder - constructs and runs the KairoIO service

use std::sync::Arc;

use kairo_action::{Dispatcher, NoStore, Registry, WebhookOpts, WebhookPool};
use kairo_types::action_store::ActionStore;
use kairo_types::identity_adapter::IdentityAdapter;

use crate::prelude::*;
use crate::routes;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug)]
pub struct AppState {
	pub registry: Arc<Registry>,
	pub dispatcher: Dispatcher,
	pub identity: Arc<dyn IdentityAdapter>,
	pub opts: AppBuilderOpts,
}

pub type App = Arc<AppState>;

#[derive(Debug, Clone)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub webhook: WebhookOpts,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	store: Option<Arc<dyn ActionStore>>,
	identity: Option<Arc<dyn IdentityAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts { listen: "0.0.0.0:8080".into(), webhook: WebhookOpts::default() },
			store: None,
			identity: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self {
		self.opts.listen = listen.into();
		self
	}
	pub fn webhook(&mut self, webhook: WebhookOpts) -> &mut Self {
		self.opts.webhook = webhook;
		self
	}

	// Adapters
	/// Persistence for actions and logs. Without one nothing survives a restart.
	pub fn action_store(&mut self, store: Arc<dyn ActionStore>) -> &mut Self {
		self.store = Some(store);
		self
	}
	pub fn identity_adapter(&mut self, identity: Arc<dyn IdentityAdapter>) -> &mut Self {
		self.identity = Some(identity);
		self
	}

	/// Creates the app state. Must be called from within a tokio runtime.
	pub async fn build(&self) -> KrResult<App> {
		let Some(identity) = self.identity.clone() else {
			error!("FATAL: No identity adapter configured");
			return Err(Error::ConfigError("no identity adapter".into()));
		};
		let store: Arc<dyn ActionStore> = match &self.store {
			Some(store) => store.clone(),
			None => {
				warn!("No action store configured, actions will not be persisted");
				Arc::new(NoStore)
			}
		};

		let registry = Arc::new(Registry::new(store).await);
		let webhooks = WebhookPool::new(&self.opts.webhook)?;
		let dispatcher = Dispatcher::new(registry.clone(), webhooks);

		Ok(Arc::new(AppState { registry, dispatcher, identity, opts: self.opts.clone() }))
	}

	pub async fn run(self) -> KrResult<()> {
		info!("Starting KairoIO action service v{}", VERSION);
		let app = self.build().await?;
		let router = routes::init(app.clone());

		let listener = tokio::net::TcpListener::bind(&*app.opts.listen).await.map_err(|e| {
			error!("FATAL: Cannot listen on {}: {}", app.opts.listen, e);
			e
		})?;
		info!("Listening on HTTP {}", app.opts.listen);

		axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
		info!("Server stopped");

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self {
		Self::new()
	}
}

async fn shutdown_signal() {
	match tokio::signal::ctrl_c().await {
		Ok(()) => info!("Shutdown requested"),
		Err(e) => {
			warn!("Cannot listen for shutdown signal: {}", e);
			std::future::pending::<()>().await;
		}
	}
}

// vim: ts=4
