//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Entry price must be greater than zero")]
    InvalidEntryPrice,

    #[error("Timeout values must be greater than zero")]
    InvalidTimeout,

    #[error("Collector pubkey must be 64 lowercase hex characters")]
    InvalidCollectorPubkey,

    #[error("Invalid LNbits URL format")]
    InvalidLnbitsUrl,

    #[error("Invalid relay URL format")]
    InvalidRelayUrl,
}
