pub use kairo_types::prelude::*;

// vim: ts=4
