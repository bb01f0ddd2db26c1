//! Authentication middleware

use axum::{
	body::Body,
	extract::State,
	http::{Request, header, response::Response},
	middleware::Next,
};

use crate::extract::{Auth, AuthCtx};
use crate::prelude::*;

/// Returns the certification key from an `Authorization` header value.
/// Both `Bearer <key>` and a bare key are accepted.
pub fn cert_key(header_value: &str) -> Option<&str> {
	let key = header_value.strip_prefix("Bearer ").unwrap_or(header_value).trim();
	if key.is_empty() { None } else { Some(key) }
}

pub async fn require_auth(
	State(app): State<App>,
	mut req: Request<Body>,
	next: Next,
) -> KrResult<Response<Body>> {
	let key = req
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.and_then(cert_key)
		.ok_or(Error::Unauthorized)?;

	let account_id = app.identity.resolve_cert_key(key).await.map_err(|e| {
		debug!("Rejected certification key: {}", e);
		Error::Unauthorized
	})?;

	req.extensions_mut().insert(Auth(AuthCtx { account_id }));

	Ok(next.run(req).await)
}


// vim: ts=4
