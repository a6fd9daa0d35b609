//! Database Module
//!
//! In-memory record stores standing in for the persistence layer. Handlers
//! only see the [`RecordSource`] and [`UserStore`] traits.

pub mod repository;
pub mod seed;

pub use repository::{
    FindAllQuery, MemoryStore, MemoryUserStore, PermissionSet, Record, RecordPage, RecordSource,
    UserRecord, UserStore,
};
pub use seed::SeedData;

use std::path::Path;
use std::sync::Arc;

use shared::models::{Appointment, Customer, ServiceRequest};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Database service: owns the record stores
#[derive(Clone)]
pub struct DbService {
    pub customers: Arc<dyn RecordSource<Customer>>,
    pub requests: Arc<dyn RecordSource<ServiceRequest>>,
    pub appointments: Arc<dyn RecordSource<Appointment>>,
    pub users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for DbService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbService").finish_non_exhaustive()
    }
}

impl DbService {
    /// Empty stores
    pub fn new() -> Self {
        Self::from_seed(SeedData::default())
    }

    /// Stores populated from seed data
    pub fn from_seed(seed: SeedData) -> Self {
        let users = MemoryUserStore::new();
        for role in seed.roles {
            users.upsert_role(role);
        }
        for user in seed.users {
            users.upsert_user(user);
        }

        tracing::info!(
            customers = seed.customers.len(),
            requests = seed.requests.len(),
            appointments = seed.appointments.len(),
            "Record stores initialized"
        );

        Self {
            customers: Arc::new(MemoryStore::with_records(seed.customers)),
            requests: Arc::new(MemoryStore::with_records(seed.requests)),
            appointments: Arc::new(MemoryStore::with_records(seed.appointments)),
            users: Arc::new(users),
        }
    }

    /// Load seed data from a JSON file, or start empty when no file is configured
    pub fn open(seed_file: Option<&Path>) -> RepoResult<Self> {
        match seed_file {
            Some(path) => Ok(Self::from_seed(SeedData::load(path)?)),
            None => Ok(Self::new()),
        }
    }
}

impl Default for DbService {
    fn default() -> Self {
        Self::new()
    }
}
