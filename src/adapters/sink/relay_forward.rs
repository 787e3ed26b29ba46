//! Admission sink forwarding records to a companion relay over HTTP.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::listing::AdmittedRecord;
use crate::ports::{AdmissionSink, SinkError};

/// Configuration for the relay-forwarding sink.
#[derive(Debug, Clone)]
pub struct RelayForwardConfig {
    /// Base URL of the relay's HTTP ingest.
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl RelayForwardConfig {
    /// Creates a config for the given relay URL with a 10 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Admission sink that forwards each record to the companion relay
/// instead of storing it locally: the forward-to-external-relay
/// deployment variant.
pub struct RelayForwardSink {
    config: RelayForwardConfig,
    http_client: reqwest::Client,
}

impl RelayForwardSink {
    /// Creates a sink for the configured relay.
    pub fn new(config: RelayForwardConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }

    fn ingest_url(&self) -> String {
        format!("{}/api/event", self.config.base_url)
    }
}

#[async_trait]
impl AdmissionSink for RelayForwardSink {
    async fn publish(&self, record: &AdmittedRecord) -> Result<(), SinkError> {
        let response = self
            .http_client
            .post(self.ingest_url())
            .json(record)
            .send()
            .await
            .map_err(|e| SinkError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(entry_key = %record.entry_key, "record forwarded to relay");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if status.is_client_error() {
            Err(SinkError::Rejected(format!("{}: {}", status, body)))
        } else {
            Err(SinkError::Unavailable(format!("{}: {}", status, body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_trims_trailing_slash() {
        let config = RelayForwardConfig::new("http://localhost:3334/");
        assert_eq!(config.base_url, "http://localhost:3334");
    }

    #[test]
    fn ingest_url_is_built_from_base() {
        let sink = RelayForwardSink::new(RelayForwardConfig::new("http://localhost:3334"));
        assert_eq!(sink.ingest_url(), "http://localhost:3334/api/event");
    }
}
