//! User Model

use serde::{Deserialize, Serialize};

/// Back-office user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Role name reference
    pub role: String,
    /// Permissions granted on top of the role
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
