//! Shared types for Desk
//!
//! Domain records, permission helpers and the response envelope used by
//! `desk-server` and its API clients.

pub mod models;
pub mod response;
pub mod types;

// Re-exports
pub use response::ApiResponse;
pub use serde::{Deserialize, Serialize};
pub use types::{Permission, SUPER_PERMISSION, Timestamp, permission_grants};
