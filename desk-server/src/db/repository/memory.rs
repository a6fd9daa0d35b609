//! In-memory record store

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{FindAllQuery, Record, RecordPage, RecordSource};
use crate::db::RepoResult;

/// Vector-backed [`RecordSource`]; records keep insertion order
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn insert(&self, record: T) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl<T: Record> RecordSource<T> for MemoryStore<T> {
    async fn find_all(&self, query: FindAllQuery) -> RepoResult<RecordPage<T>> {
        let records = self.records.read();
        let matching: Vec<&T> = records
            .iter()
            .filter(|r| query.status.as_deref().is_none_or(|s| r.status() == s))
            .collect();

        let total = matching.len() as u64;
        let data = matching.into_iter().take(query.limit).cloned().collect();

        Ok(RecordPage { data, total })
    }

    async fn count(&self, status: Option<&str>) -> RepoResult<u64> {
        let records = self.records.read();
        let n = match status {
            Some(s) => records.iter().filter(|r| r.status() == s).count(),
            None => records.len(),
        };
        Ok(n as u64)
    }
}
