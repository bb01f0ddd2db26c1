//! Action-related types shared between the engine, the HTTP layer, and adapters.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::collections::HashMap;
use std::fmt;

use crate::types::Timestamp;

/// Parameter values are arbitrary JSON
pub type ParamValue = serde_json::Value;
pub type ParamMap = serde_json::Map<String, ParamValue>;

/// Status recorded for every accepted invocation
pub const STATUS_RECEIVED: &str = "received";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
	String,
	Number,
	Boolean,
	Object,
	Array,
}

impl fmt::Display for ParamType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ParamType::String => "string",
			ParamType::Number => "number",
			ParamType::Boolean => "boolean",
			ParamType::Object => "object",
			ParamType::Array => "array",
		})
	}
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDef {
	#[serde(rename = "type")]
	pub typ: ParamType,
	#[serde(default)]
	pub required: bool,
	/// Advisory for clients, never applied by validation
	pub default: Option<ParamValue>,
	pub description: Option<Box<str>>,
	pub min: Option<f64>,
	pub max: Option<f64>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub r#enum: Vec<Box<str>>,
}

impl ParamDef {
	pub fn new(typ: ParamType) -> Self {
		Self {
			typ,
			required: false,
			default: None,
			description: None,
			min: None,
			max: None,
			r#enum: Vec::new(),
		}
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	pub fn range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
		self.min = min;
		self.max = max;
		self
	}

	pub fn one_of(mut self, values: impl IntoIterator<Item = impl Into<Box<str>>>) -> Self {
		self.r#enum = values.into_iter().map(Into::into).collect();
		self
	}
}

/// A registered remote-control verb with its parameter schema
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
	#[serde(default)]
	pub id: Box<str>,
	#[serde(default)]
	pub name: Box<str>,
	pub description: Option<Box<str>>,
	/// Owning account, `None` for public actions
	pub account_id: Option<Box<str>>,
	/// Device types this action applies to, empty means all
	#[serde(default)]
	pub robot_types: Vec<Box<str>>,
	#[serde(default)]
	pub parameters: HashMap<Box<str>, ParamDef>,
	pub metadata: Option<ParamMap>,
	pub webhook_url: Option<Box<str>>,
	#[serde(default)]
	pub created_at: Timestamp,
	#[serde(default)]
	pub updated_at: Timestamp,
}

impl Action {
	pub fn new(id: impl Into<Box<str>>, name: impl Into<Box<str>>) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			description: None,
			account_id: None,
			robot_types: Vec::new(),
			parameters: HashMap::new(),
			metadata: None,
			webhook_url: None,
			created_at: Timestamp::default(),
			updated_at: Timestamp::default(),
		}
	}

	pub fn owned_by(mut self, account_id: impl Into<Box<str>>) -> Self {
		self.account_id = Some(account_id.into());
		self
	}

	pub fn param(mut self, name: impl Into<Box<str>>, def: ParamDef) -> Self {
		self.parameters.insert(name.into(), def);
		self
	}

	pub fn webhook(mut self, url: impl Into<Box<str>>) -> Self {
		self.webhook_url = Some(url.into());
		self
	}

	/// Account id used for the secondary index ("" for public actions)
	pub fn owner_key(&self) -> &str {
		self.account_id.as_deref().unwrap_or("")
	}

	pub fn is_public(&self) -> bool {
		self.owner_key().is_empty()
	}

	/// Non-empty webhook URL, if any
	pub fn webhook_target(&self) -> Option<&str> {
		self.webhook_url.as_deref().filter(|url| !url.is_empty())
	}
}

/// One invocation attempt sent by (or on behalf of) a device
#[skip_serializing_none]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionRequest {
	#[serde(default)]
	pub action: Box<str>,
	pub parameters: Option<ParamMap>,
	#[serde(rename = "requestId")]
	pub request_id: Option<Box<str>>,
	/// Client-side timestamp, informational only
	pub timestamp: Option<Box<str>>,
	#[serde(default)]
	pub priority: i32,
	#[serde(default)]
	pub timeout: f64,
}

/// Audit record of one invocation, immutable once written
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionLog {
	#[serde(default)]
	pub id: u64,
	pub action_id: Box<str>,
	pub robot_id: Box<str>,
	pub account_id: Box<str>,
	pub request_id: Option<Box<str>>,
	pub parameters: Option<ParamMap>,
	pub status: Box<str>,
	pub response: Option<ParamMap>,
	pub timestamp: Timestamp,
}


// vim: ts=4
