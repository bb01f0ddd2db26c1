//! Custom extractors for KairoIO request data

use axum::Json;
use axum::extract::{FromRequest, FromRequestParts, Request, rejection::JsonRejection};
use axum::http::request::Parts;

use crate::prelude::*;

// Auth //
//******//
/// Authenticated caller, inserted into the request by `require_auth`
#[derive(Debug, Clone)]
pub struct AuthCtx {
	pub account_id: Box<str>,
}

#[derive(Debug, Clone)]
pub struct Auth(pub AuthCtx);

impl<S> FromRequestParts<S> for Auth
where
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		if let Some(auth) = parts.extensions.get::<Auth>().cloned() {
			Ok(auth)
		} else {
			Err(Error::Unauthorized)
		}
	}
}

// JsonBody //
//**********//
/// JSON request body whose rejections use the API error envelope
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
	Json<T>: FromRequest<S, Rejection = JsonRejection>,
	S: Send + Sync,
{
	type Rejection = Error;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
			debug!("Invalid request body: {}", e);
			Error::Parse
		})?;
		Ok(JsonBody(value))
	}
}

// vim: ts=4
