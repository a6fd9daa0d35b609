//! Repository Module
//!
//! Collaborator contracts consumed by the statistics and permission layers,
//! plus their in-memory implementations.

pub mod memory;
pub mod user;

pub use memory::MemoryStore;
pub use user::MemoryUserStore;

use async_trait::async_trait;
use serde::Serialize;
use shared::models::{Appointment, Customer, ServiceRequest};

use super::RepoResult;

/// Default upper bound for a single fetch
pub const DEFAULT_FETCH_LIMIT: usize = 1000;

/// A record that can be filtered by status
pub trait Record: Clone + Send + Sync + 'static {
    fn status(&self) -> &'static str;
}

impl Record for Customer {
    fn status(&self) -> &'static str {
        self.status.as_str()
    }
}

impl Record for ServiceRequest {
    fn status(&self) -> &'static str {
        self.status.as_str()
    }
}

impl Record for Appointment {
    fn status(&self) -> &'static str {
        self.status.as_str()
    }
}

/// Query for [`RecordSource::find_all`]
#[derive(Debug, Clone)]
pub struct FindAllQuery {
    pub limit: usize,
    /// Exact status match (e.g. `"active"`)
    pub status: Option<String>,
}

impl FindAllQuery {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            status: None,
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl Default for FindAllQuery {
    fn default() -> Self {
        Self::with_limit(DEFAULT_FETCH_LIMIT)
    }
}

/// Bounded page of records
///
/// `total` is the number of matching records before `limit` was applied.
#[derive(Debug, Clone, Serialize)]
pub struct RecordPage<T> {
    pub data: Vec<T>,
    pub total: u64,
}

/// Source of domain records
///
/// Ordering of `data` is unspecified; callers must not rely on it.
#[async_trait]
pub trait RecordSource<T>: Send + Sync {
    async fn find_all(&self, query: FindAllQuery) -> RepoResult<RecordPage<T>>;

    /// Number of records, optionally restricted to one status
    async fn count(&self, status: Option<&str>) -> RepoResult<u64>;
}

/// What the permission evaluator needs to know about a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub role: String,
    pub is_active: bool,
}

/// Effective permissions of a user (role grants plus per-user extras)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionSet {
    pub permissions: Vec<String>,
}

impl PermissionSet {
    pub fn new(permissions: Vec<String>) -> Self {
        Self { permissions }
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Whether any granted code covers `code` (exact, `module:*` or `all`)
    pub fn grants(&self, code: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| shared::permission_grants(p, code))
    }
}

/// User and permission lookup
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, user_id: i64) -> RepoResult<Option<UserRecord>>;

    /// Fails with `NotFound` for unknown users
    async fn get_user_permissions(&self, user_id: i64) -> RepoResult<PermissionSet>;
}
