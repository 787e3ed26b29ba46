//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is
//! loaded with the `LISTING_GATE` prefix and nested values use double
//! underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use listing_gate::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod gate;
mod lightning;
mod trust;

pub use error::{ConfigError, ValidationError};
pub use gate::GateConfig;
pub use lightning::LightningConfig;
pub use trust::TrustConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Payment gate configuration (price, timing, collector)
    pub gate: GateConfig,

    /// Lightning backend configuration (LNbits)
    pub lightning: LightningConfig,

    /// Trust oracle configuration (companion relay)
    pub trust: TrustConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `LISTING_GATE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `LISTING_GATE__GATE__ENTRY_PRICE_SATS=1000` -> `gate.entry_price_sats = 1000`
    /// - `LISTING_GATE__LIGHTNING__LNBITS_URL=...` -> `lightning.lnbits_url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LISTING_GATE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gate.validate()?;
        self.lightning.validate()?;
        self.trust.validate()?;
        Ok(())
    }
}
