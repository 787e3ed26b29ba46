//! Admission sink port: where admitted records go.
//!
//! The gate is parameterized by this capability: a sink may store
//! records directly or forward them to an external relay. Selected at
//! controller construction.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::listing::AdmittedRecord;

/// Errors from publishing an admitted record.
///
/// A publish failure never invalidates the payment that earned the
/// admission; the entry key is already recorded settled, so the
/// submitter recovers by resubmitting.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink could not be reached; retryable.
    #[error("admission sink unavailable: {0}")]
    Unavailable(String),

    /// The sink refused the record.
    #[error("admission sink rejected record: {0}")]
    Rejected(String),
}

impl SinkError {
    /// Whether retrying the same publish may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SinkError::Unavailable(_))
    }
}

/// Port for handing admitted records to the external event store.
#[async_trait]
pub trait AdmissionSink: Send + Sync {
    /// Publishes one admitted record.
    async fn publish(&self, record: &AdmittedRecord) -> Result<(), SinkError>;
}
