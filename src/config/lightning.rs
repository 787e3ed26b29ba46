//! Lightning backend configuration (LNbits)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// LNbits backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LightningConfig {
    /// Base URL of the LNbits instance
    pub lnbits_url: String,

    /// Wallet invoice key
    pub lnbits_api_key: SecretString,
}

impl LightningConfig {
    /// Validate Lightning configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lnbits_url.is_empty() {
            return Err(ValidationError::MissingRequired("LIGHTNING_LNBITS_URL"));
        }
        if !self.lnbits_url.starts_with("http://") && !self.lnbits_url.starts_with("https://") {
            return Err(ValidationError::InvalidLnbitsUrl);
        }
        if self.lnbits_api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("LIGHTNING_LNBITS_API_KEY"));
        }
        Ok(())
    }
}
