//! Shared types, store traits, and core utilities for the KairoIO backend.
//!
//! This crate holds the action data model and the adapter traits that the
//! engine, the HTTP layer, and every storage adapter agree on. Keeping them
//! here lets adapter crates compile without pulling in the server.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod action_store;
pub mod action_types;
pub mod error;
pub mod identity_adapter;
pub mod prelude;
pub mod types;

// vim: ts=4
