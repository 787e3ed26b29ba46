//! Trust oracle querying a companion relay over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::foundation::SubmitterId;
use crate::ports::TrustOracle;

/// Configuration for the relay trust endpoint.
#[derive(Debug, Clone)]
pub struct RelayTrustConfig {
    /// Base URL of the companion relay's HTTP interface.
    pub base_url: String,

    /// Per-request timeout.
    pub request_timeout: Duration,
}

impl RelayTrustConfig {
    /// Creates a config for the given relay URL with a 5 second timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(5),
        }
    }

    /// Sets the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Trust oracle backed by the companion relay's trust-check endpoint.
///
/// Fails closed: any transport error, non-success status, or
/// unparseable body answers "not trusted" and the submitter pays.
pub struct RelayHttpTrustOracle {
    config: RelayTrustConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct TrustCheckResponse {
    trusted: bool,
}

impl RelayHttpTrustOracle {
    /// Creates an oracle for the configured relay.
    pub fn new(config: RelayTrustConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .unwrap_or_default();
        Self {
            config,
            http_client,
        }
    }

    fn trust_check_url(&self) -> String {
        format!("{}/api/trust-check", self.config.base_url)
    }
}

#[async_trait]
impl TrustOracle for RelayHttpTrustOracle {
    async fn is_trusted(&self, identity: &SubmitterId) -> bool {
        let response = self
            .http_client
            .post(self.trust_check_url())
            .json(&serde_json::json!({ "pubkey": identity.as_str() }))
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "trust check unreachable, treating as untrusted");
                return false;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "trust check failed, treating as untrusted");
            return false;
        }

        match response.json::<TrustCheckResponse>().await {
            Ok(body) => body.trusted,
            Err(e) => {
                tracing::warn!(error = %e, "unparseable trust check response, treating as untrusted");
                false
            }
        }
    }
}
