//! Identity resolution: maps a presented certification key to an account and
//! tells which account a device belongs to.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::prelude::*;

#[async_trait]
pub trait IdentityAdapter: Debug + Send + Sync {
	/// Returns the account id owning `cert_key`, or `Error::Unauthorized`
	async fn resolve_cert_key(&self, cert_key: &str) -> KrResult<Box<str>>;
	/// Returns the account id a robot is registered under, or `Error::NotFound`
	async fn robot_owner(&self, robot_id: &str) -> KrResult<Box<str>>;
}

// vim: ts=4
