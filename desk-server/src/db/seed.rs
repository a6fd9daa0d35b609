//! Seed data loading
//!
//! A single JSON document with one array per record type. Missing arrays are
//! treated as empty.

use std::path::Path;

use serde::Deserialize;
use shared::models::{Appointment, Customer, Role, ServiceRequest, User};

use super::{RepoError, RepoResult};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeedData {
    pub roles: Vec<Role>,
    pub users: Vec<User>,
    pub customers: Vec<Customer>,
    pub requests: Vec<ServiceRequest>,
    pub appointments: Vec<Appointment>,
}

impl SeedData {
    pub fn load(path: &Path) -> RepoResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            RepoError::Database(format!("Failed to read seed file {}: {e}", path.display()))
        })?;
        Self::from_json(&raw)
            .map_err(|e| RepoError::Database(format!("Invalid seed file {}: {e}", path.display())))
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_document() {
        let seed = SeedData::from_json(r#"{"users":[{"id":1,"username":"amy","role":"admin"}]}"#)
            .unwrap();
        assert_eq!(seed.users.len(), 1);
        assert!(seed.users[0].is_active);
        assert!(seed.customers.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"customers":[{{"id":1,"name":"Acme","email":null,"phone":null,"status":"active","customer_type":"business","created_at":0,"updated_at":0}}]}}"#
        )
        .unwrap();

        let seed = SeedData::load(file.path()).unwrap();
        assert_eq!(seed.customers.len(), 1);
    }

    #[test]
    fn test_example_seed_parses() {
        let seed = SeedData::from_json(include_str!("../../seed.example.json")).unwrap();
        assert_eq!(seed.users.len(), 5);
        assert!(!seed.users[4].is_active);
        assert_eq!(seed.roles[0].permissions, vec!["statistics:view"]);
        assert!(seed.appointments[2].appointment_date.is_empty());
    }

    #[test]
    fn test_missing_file_is_database_error() {
        let err = SeedData::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, RepoError::Database(_)));
    }
}
