//! Error type shared by the engine, the stores, and the HTTP layer.

use axum::{
	Json,
	http::StatusCode,
	response::{IntoResponse, Response},
};
use std::fmt;

use crate::action_types::ParamType;

pub type KrResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	AlreadyExists,
	/// Malformed action definition (missing id/name, incoherent parameter schema)
	InvalidAction(Box<str>),
	/// Invocation parameters violate a registered schema
	InvalidParam(ParamError),
	PermissionDenied,
	Unauthorized,
	DbError,
	Parse,
	ConfigError(String),
	Internal(String),

	// externals
	Io(std::io::Error),
}

/// First schema violation found while validating an invocation
#[derive(Debug, Clone, PartialEq)]
pub struct ParamError {
	pub param: Box<str>,
	pub violation: ParamViolation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamViolation {
	Missing,
	WrongType(ParamType),
	NotInEnum(Vec<Box<str>>),
	BelowMin(f64),
	AboveMax(f64),
}

impl ParamError {
	pub fn new(param: &str, violation: ParamViolation) -> Self {
		Self { param: param.into(), violation }
	}
}

impl fmt::Display for ParamError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let param = &self.param;
		match &self.violation {
			ParamViolation::Missing => write!(f, "missing required parameter: {}", param),
			ParamViolation::WrongType(typ) => write!(f, "parameter {} must be a {}", param, typ),
			ParamViolation::NotInEnum(allowed) => {
				write!(f, "parameter {} must be one of: {}", param, allowed.join(", "))
			}
			ParamViolation::BelowMin(min) => write!(f, "parameter {} must be >= {}", param, min),
			ParamViolation::AboveMax(max) => write!(f, "parameter {} must be <= {}", param, max),
		}
	}
}

impl std::error::Error for ParamError {}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::NotFound => write!(f, "action not found"),
			Error::AlreadyExists => write!(f, "action already exists"),
			Error::InvalidAction(reason) => write!(f, "invalid action definition: {}", reason),
			Error::InvalidParam(err) => fmt::Display::fmt(err, f),
			Error::PermissionDenied => write!(f, "access denied"),
			Error::Unauthorized => write!(f, "unauthorized"),
			Error::DbError => write!(f, "database error"),
			Error::Parse => write!(f, "invalid request body"),
			Error::ConfigError(msg) => write!(f, "config error: {}", msg),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl From<ParamError> for Error {
	fn from(err: ParamError) -> Self {
		Error::InvalidParam(err)
	}
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Error::Io(err)
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		tracing::debug!("json error: {}", err);
		Error::Parse
	}
}

impl Error {
	pub fn status_code(&self) -> StatusCode {
		match self {
			Error::NotFound => StatusCode::NOT_FOUND,
			Error::AlreadyExists => StatusCode::CONFLICT,
			Error::InvalidAction(_) | Error::InvalidParam(_) | Error::Parse => {
				StatusCode::BAD_REQUEST
			}
			Error::Unauthorized => StatusCode::UNAUTHORIZED,
			Error::PermissionDenied => StatusCode::FORBIDDEN,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn code(&self) -> &'static str {
		match self {
			Error::NotFound => "E-NOT-FOUND",
			Error::AlreadyExists => "E-CONFLICT",
			Error::InvalidAction(_) | Error::InvalidParam(_) | Error::Parse => "E-VALIDATION",
			Error::Unauthorized => "E-UNAUTHORIZED",
			Error::PermissionDenied => "E-FORBIDDEN",
			_ => "E-INTERNAL",
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		let status = self.status_code();
		let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
			tracing::error!("request failed: {}", self);
			"internal server error".to_string()
		} else {
			self.to_string()
		};
		let body = serde_json::json!({
			"success": false,
			"error": {
				"code": self.code(),
				"message": message,
			}
		});
		(status, Json(body)).into_response()
	}
}


// vim: ts=4
