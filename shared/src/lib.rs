//! Shared types for the Atelier CRM server
//!
//! Wire models and utility types shared between the server and its
//! clients. Field names on the models are the wire contract with the
//! existing chat-platform integration and the join/redirect landing
//! page — renaming a serialized field is a breaking change.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
