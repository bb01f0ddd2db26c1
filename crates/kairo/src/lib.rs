//! KairoIO action service.
//!
//! Wires the action engine to an axum HTTP API: accounts register actions
//! with a parameter schema, and their robots invoke them through the
//! control endpoint. Requests authenticate with a certification key which
//! an [`IdentityAdapter`](kairo_types::identity_adapter::IdentityAdapter)
//! maps to an account.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config;
pub mod extract;
pub mod handler;
pub mod identity;
pub mod logging;
pub mod middleware;
pub mod routes;

mod prelude;

pub use crate::app::{App, AppBuilder, AppState, VERSION};
pub use crate::config::Config;
pub use crate::identity::StaticIdentityAdapter;

// vim: ts=4
