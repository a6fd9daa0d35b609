//! Role Model

use serde::{Deserialize, Serialize};

/// Role entity (RBAC)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub description: Option<String>,
    /// Permission codes, e.g. `["all"]` or `["customers:view", "requests:*"]`
    pub permissions: Vec<String>,
    #[serde(default)]
    pub is_system: bool,
}
