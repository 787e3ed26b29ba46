//! In-memory admission sink: the direct-store variant, also the test double.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::EntryKey;
use crate::domain::listing::AdmittedRecord;
use crate::ports::{AdmissionSink, SinkError};

/// Admission sink that stores records in memory.
///
/// Serves two roles: the direct-store deployment variant (records kept
/// by this process) and the assertion target for tests, with error
/// injection for publish-failure paths.
#[derive(Debug, Default)]
pub struct InMemoryAdmissionSink {
    records: RwLock<Vec<AdmittedRecord>>,
    fail_next: Mutex<Option<SinkError>>,
}

impl InMemoryAdmissionSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Injects an error for the next `publish` call.
    pub async fn fail_next(&self, error: SinkError) {
        *self
            .fail_next
            .lock()
            .expect("InMemoryAdmissionSink lock poisoned") = Some(error);
    }

    /// Returns all published records.
    pub async fn records(&self) -> Vec<AdmittedRecord> {
        self.records.read().await.clone()
    }

    /// Number of published records.
    pub async fn published_count(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether a record with the given key was published.
    pub async fn has_key(&self, key: &EntryKey) -> bool {
        self.records
            .read()
            .await
            .iter()
            .any(|record| record.entry_key == *key)
    }

    /// Clears all records (for test isolation).
    pub async fn clear(&self) {
        self.records.write().await.clear();
    }
}

#[async_trait]
impl AdmissionSink for InMemoryAdmissionSink {
    async fn publish(&self, record: &AdmittedRecord) -> Result<(), SinkError> {
        let injected = self
            .fail_next
            .lock()
            .expect("InMemoryAdmissionSink lock poisoned")
            .take();
        if let Some(error) = injected {
            return Err(error);
        }

        self.records.write().await.push(record.clone());
        Ok(())
    }
}
