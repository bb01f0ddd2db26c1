//! Common types used throughout the KairoIO backend.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

// Timestamp //
//***********//
pub type Timestamp = DateTime<Utc>;

pub fn now() -> Timestamp {
	Utc::now()
}

/// Returns the current time, or one microsecond past `prev` if the clock has
/// not moved beyond it yet.
pub fn now_after(prev: Timestamp) -> Timestamp {
	let now = Utc::now();
	if now > prev { now } else { prev + TimeDelta::microseconds(1) }
}

// ApiResponse //
//*************//
/// Success envelope for every JSON endpoint: `{"success": true, "data": ...}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
	pub success: bool,
	pub data: T,
}

impl<T> ApiResponse<T> {
	pub fn new(data: T) -> Self {
		Self { success: true, data }
	}
}


// vim: ts=4
