//! User / Role Repository (in-memory)

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{Role, User};

use super::{PermissionSet, UserRecord, UserStore};
use crate::auth::permissions::get_default_permissions;
use crate::db::{RepoError, RepoResult};

/// Users and roles keyed by id / lowercase role name
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<i64, User>>,
    roles: RwLock<HashMap<String, Role>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_user(&self, user: User) {
        self.users.write().insert(user.id, user);
    }

    pub fn upsert_role(&self, role: Role) {
        self.roles.write().insert(role.name.to_lowercase(), role);
    }

    /// Permissions granted by a role: stored role first, built-in defaults otherwise
    fn role_permissions(&self, role_name: &str) -> Vec<String> {
        let key = role_name.to_lowercase();
        match self.roles.read().get(&key) {
            Some(role) => role.permissions.clone(),
            None => get_default_permissions(&key),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, user_id: i64) -> RepoResult<Option<UserRecord>> {
        Ok(self.users.read().get(&user_id).map(|u| UserRecord {
            id: u.id,
            role: u.role.clone(),
            is_active: u.is_active,
        }))
    }

    async fn get_user_permissions(&self, user_id: i64) -> RepoResult<PermissionSet> {
        let user = self
            .users
            .read()
            .get(&user_id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(format!("User {user_id} not found")))?;

        let mut permissions = self.role_permissions(&user.role);
        for extra in user.permissions {
            if !permissions.contains(&extra) {
                permissions.push(extra);
            }
        }

        Ok(PermissionSet::new(permissions))
    }
}
