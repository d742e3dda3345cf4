//! Common types used across the Korbit client library.

pub mod common;
pub mod serde_helpers;

pub use common::*;
