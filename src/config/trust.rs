//! Trust oracle configuration

use serde::Deserialize;

use super::error::ValidationError;

fn default_request_timeout_secs() -> u64 {
    5
}

/// Companion relay trust endpoint configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TrustConfig {
    /// Base URL of the companion relay's HTTP interface
    pub relay_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl TrustConfig {
    /// Validate trust configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.relay_url.is_empty() {
            return Err(ValidationError::MissingRequired("TRUST_RELAY_URL"));
        }
        if !self.relay_url.starts_with("http://") && !self.relay_url.starts_with("https://") {
            return Err(ValidationError::InvalidRelayUrl);
        }
        if self.request_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}
