//! Action subsystem. Actions are named remote-control verbs with a typed
//! parameter schema, registered by accounts and invoked by their devices.
//!
//! The [`Registry`] owns the live index, [`validate`] checks invocations
//! against a schema, and the [`Dispatcher`] turns one invocation into an
//! audit record plus an optional webhook call on the [`WebhookPool`].

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod dispatch;
pub mod registry;
pub mod store;
pub mod validate;
pub mod webhook;

mod prelude;

pub use dispatch::{Dispatcher, Invoker, Receipt};
pub use registry::Registry;
pub use store::{MemoryStore, NoStore};
pub use webhook::{WebhookOpts, WebhookPayload, WebhookPool};

// vim: ts=4
