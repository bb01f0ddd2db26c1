//! Webhook delivery pool.
//!
//! Jobs go through a bounded queue drained by a fixed set of tokio tasks
//! sharing one HTTP client. Submitting never waits: when the queue is full
//! the job is dropped. Delivery failures are logged and never retried.

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::{Client, connect::HttpConnector};
use hyper_util::rt::TokioExecutor;
use serde::Serialize;
use serde_with::skip_serializing_none;
use std::sync::Arc;
use std::time::Duration;

use kairo_types::action_types::ParamMap;

use crate::prelude::*;

type HttpClient = Client<HttpsConnector<HttpConnector>, Full<Bytes>>;

/// Response body bytes kept in the delivery log line
const LOG_BODY_LIMIT: usize = 256;

#[derive(Debug, Clone)]
pub struct WebhookOpts {
	/// Number of concurrent delivery tasks
	pub workers: usize,
	/// Jobs waiting beyond this are dropped
	pub queue_size: usize,
	/// Upper bound for one delivery, connect to last body byte
	pub timeout: Duration,
}

impl Default for WebhookOpts {
	fn default() -> Self {
		Self { workers: 4, queue_size: 256, timeout: Duration::from_secs(10) }
	}
}

/// JSON body posted to the action's webhook
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
pub struct WebhookPayload {
	pub robot_id: Box<str>,
	pub action: Box<str>,
	pub parameters: Option<ParamMap>,
	pub request_id: Option<Box<str>>,
	pub timestamp: Timestamp,
}

#[derive(Debug)]
struct WebhookJob {
	url: Box<str>,
	payload: WebhookPayload,
}

/// Outcome of one delivery attempt
#[derive(Debug)]
pub enum WebhookResult {
	Delivered(u16),
	/// Endpoint answered with a non-2xx status
	Rejected(u16, String),
	Failed(String),
}

#[derive(Debug, Clone)]
pub struct WebhookPool {
	tx: flume::Sender<WebhookJob>,
}

impl WebhookPool {
	/// Starts the delivery tasks. Must be called from within a tokio runtime.
	///
	/// At least one worker is required: the queue closes as soon as no task
	/// holds its receiving end.
	pub fn new(opts: &WebhookOpts) -> KrResult<Self> {
		if opts.workers == 0 {
			return Err(Error::ConfigError("webhook pool needs at least one worker".into()));
		}
		let client = build_client()?;
		let (tx, rx) = flume::bounded::<WebhookJob>(opts.queue_size.max(1));

		for _ in 0..opts.workers {
			let rx = rx.clone();
			let client = client.clone();
			let timeout = opts.timeout;
			tokio::spawn(async move {
				while let Ok(job) = rx.recv_async().await {
					run_job(&client, job, timeout).await;
				}
			});
		}
		debug!("Webhook pool started with {} workers", opts.workers);

		Ok(Self { tx })
	}

	/// Queues a delivery. Returns `false` if the job had to be dropped.
	pub fn submit(&self, url: &str, payload: WebhookPayload) -> bool {
		let job = WebhookJob { url: url.into(), payload };
		match self.tx.try_send(job) {
			Ok(()) => true,
			Err(flume::TrySendError::Full(job)) => {
				warn!("[WEBHOOK] Queue full, dropping call to {} for {}", job.url, job.payload.action);
				false
			}
			Err(flume::TrySendError::Disconnected(job)) => {
				error!("[WEBHOOK] Pool stopped, dropping call to {}", job.url);
				false
			}
		}
	}

	/// Jobs waiting for a worker
	pub fn pending(&self) -> usize {
		self.tx.len()
	}
}

async fn run_job(client: &HttpClient, job: WebhookJob, timeout: Duration) {
	match deliver(client, &job.url, &job.payload, timeout).await {
		WebhookResult::Delivered(status) => {
			info!("[WEBHOOK] Called {}, status: {}", job.url, status);
		}
		WebhookResult::Rejected(status, body) => {
			warn!("[WEBHOOK] Called {}, status: {}, response: {}", job.url, status, body);
		}
		WebhookResult::Failed(err) => {
			error!("[WEBHOOK] Failed to call {}: {}", job.url, err);
		}
	}
}

/// Posts `payload` to `url` once
async fn deliver(
	client: &HttpClient,
	url: &str,
	payload: &WebhookPayload,
	timeout: Duration,
) -> WebhookResult {
	let body = match serde_json::to_vec(payload) {
		Ok(body) => body,
		Err(e) => return WebhookResult::Failed(format!("payload serialization error: {}", e)),
	};

	let request = match hyper::Request::builder()
		.method(hyper::Method::POST)
		.uri(url)
		.header("Content-Type", "application/json")
		.header("User-Agent", concat!("kairo/", env!("CARGO_PKG_VERSION")))
		.body(Full::new(Bytes::from(body)))
	{
		Ok(req) => req,
		Err(e) => return WebhookResult::Failed(format!("request build error: {}", e)),
	};

	let exchange = async {
		let response = client.request(request).await.map_err(|e| format!("network error: {}", e))?;
		let status = response.status();
		let body = response
			.into_body()
			.collect()
			.await
			.map(|b| b.to_bytes())
			.map_err(|e| format!("body read error: {}", e))?;
		Ok::<_, String>((status, body))
	};

	match tokio::time::timeout(timeout, exchange).await {
		Err(_) => WebhookResult::Failed(format!("timed out after {:?}", timeout)),
		Ok(Err(e)) => WebhookResult::Failed(e),
		Ok(Ok((status, _))) if status.is_success() => WebhookResult::Delivered(status.as_u16()),
		Ok(Ok((status, body))) => {
			let end = body.len().min(LOG_BODY_LIMIT);
			let text = String::from_utf8_lossy(body.get(..end).unwrap_or_default()).into_owned();
			WebhookResult::Rejected(status.as_u16(), text)
		}
	}
}

fn build_client() -> KrResult<HttpClient> {
	let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());

	let builder = match HttpsConnectorBuilder::new().with_provider_and_native_roots(provider.clone())
	{
		Ok(builder) => builder,
		Err(e) => {
			warn!("[WEBHOOK] No native root certificates ({}), HTTPS webhooks will fail", e);
			let config = rustls::ClientConfig::builder_with_provider(provider)
				.with_safe_default_protocol_versions()
				.map_err(|e| Error::Internal(format!("TLS config error: {}", e)))?
				.with_root_certificates(rustls::RootCertStore::empty())
				.with_no_client_auth();
			HttpsConnectorBuilder::new().with_tls_config(config)
		}
	};
	let connector = builder.https_or_http().enable_http1().build();

	Ok(Client::builder(TokioExecutor::new()).build(connector))
}

// vim: ts=4
