//! Data models
//!
//! Shared between desk-server and API clients.
//! All IDs are `i64`; timestamps are Unix millis unless noted.

pub mod appointment;
pub mod customer;
pub mod role;
pub mod service_request;
pub mod user;

// Re-exports
pub use appointment::*;
pub use customer::*;
pub use role::*;
pub use service_request::*;
pub use user::*;
