//! Identity adapter backed by a fixed table, usually filled from config.

use async_trait::async_trait;
use std::collections::HashMap;

use kairo_types::identity_adapter::IdentityAdapter;

use crate::prelude::*;

#[derive(Debug, Default, Clone)]
pub struct StaticIdentityAdapter {
	/// certification key -> account id
	cert_keys: HashMap<Box<str>, Box<str>>,
	/// robot id -> account id
	robots: HashMap<Box<str>, Box<str>>,
}

impl StaticIdentityAdapter {
	pub fn new(
		cert_keys: impl IntoIterator<Item = (impl Into<Box<str>>, impl Into<Box<str>>)>,
		robots: impl IntoIterator<Item = (impl Into<Box<str>>, impl Into<Box<str>>)>,
	) -> Self {
		Self {
			cert_keys: cert_keys.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
			robots: robots.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
		}
	}
}

#[async_trait]
impl IdentityAdapter for StaticIdentityAdapter {
	async fn resolve_cert_key(&self, cert_key: &str) -> KrResult<Box<str>> {
		self.cert_keys.get(cert_key).cloned().ok_or(Error::Unauthorized)
	}

	async fn robot_owner(&self, robot_id: &str) -> KrResult<Box<str>> {
		self.robots.get(robot_id).cloned().ok_or(Error::NotFound)
	}
}


// vim: ts=4
