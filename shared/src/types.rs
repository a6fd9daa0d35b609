//! Common types for the shared crate
//!
//! Utility types used across the workspace

use serde::{Deserialize, Serialize};

/// Timestamp type (Unix milliseconds)
pub type Timestamp = i64;

/// Super permission granting every code
pub const SUPER_PERMISSION: &str = "all";

/// A granted permission code
///
/// Codes take the form `module:action`. A grant of `module:*` covers every
/// action of that module; `all` covers everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission(pub String);

impl Permission {
    /// Check if this permission grants access to the given resource action
    pub fn grants(&self, action: &str) -> bool {
        permission_grants(&self.0, action)
    }
}

/// Borrowed form of [`Permission::grants`] for codes held as plain strings
pub fn permission_grants(granted: &str, action: &str) -> bool {
    if granted == SUPER_PERMISSION {
        return true;
    }
    if let Some(module) = granted.strip_suffix(":*") {
        return action
            .strip_prefix(module)
            .is_some_and(|rest| rest.starts_with(':'));
    }
    granted == action
}

impl From<&str> for Permission {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
