//! Gate configuration: pricing and timing.

use serde::Deserialize;

use crate::application::{PriceSchedule, ReaperConfig};
use crate::domain::foundation::SubmitterId;

use super::error::ValidationError;

fn default_entry_price_sats() -> u64 {
    1000
}

fn default_payment_timeout_secs() -> u64 {
    300
}

fn default_invoice_expiry_secs() -> u64 {
    300
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_reaper_interval_secs() -> u64 {
    60
}

/// Payment gate configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GateConfig {
    /// Price of one entry in satoshis
    #[serde(default = "default_entry_price_sats")]
    pub entry_price_sats: u64,

    /// Seconds before an unconfirmed pending entry is reclaimed
    #[serde(default = "default_payment_timeout_secs")]
    pub payment_timeout_secs: u64,

    /// Seconds until an issued invoice expires
    #[serde(default = "default_invoice_expiry_secs")]
    pub invoice_expiry_secs: u64,

    /// Seconds between settlement lookups per entry
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Seconds between reaper sweeps
    #[serde(default = "default_reaper_interval_secs")]
    pub reaper_interval_secs: u64,

    /// Pubkey that collects entry payments and issues receipts
    pub collector_pubkey: String,
}

impl GateConfig {
    /// Validate gate configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.entry_price_sats == 0 {
            return Err(ValidationError::InvalidEntryPrice);
        }
        if self.payment_timeout_secs == 0
            || self.invoice_expiry_secs == 0
            || self.poll_interval_secs == 0
            || self.reaper_interval_secs == 0
        {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.collector_pubkey.is_empty() {
            return Err(ValidationError::MissingRequired("GATE_COLLECTOR_PUBKEY"));
        }
        if SubmitterId::new(self.collector_pubkey.clone()).is_err() {
            return Err(ValidationError::InvalidCollectorPubkey);
        }
        Ok(())
    }

    /// Builds the price schedule the controller runs against.
    ///
    /// Call after [`validate`](Self::validate); an invalid collector
    /// pubkey surfaces here as an error as well.
    pub fn price_schedule(&self) -> Result<PriceSchedule, ValidationError> {
        let collector = SubmitterId::new(self.collector_pubkey.clone())
            .map_err(|_| ValidationError::InvalidCollectorPubkey)?;
        Ok(PriceSchedule::new(collector)
            .with_price_sats(self.entry_price_sats)
            .with_payment_timeout_secs(self.payment_timeout_secs)
            .with_invoice_expiry_secs(self.invoice_expiry_secs)
            .with_poll_interval(std::time::Duration::from_secs(self.poll_interval_secs)))
    }

    /// Builds the reaper configuration.
    pub fn reaper_config(&self) -> ReaperConfig {
        ReaperConfig::default()
            .with_sweep_interval(std::time::Duration::from_secs(self.reaper_interval_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> GateConfig {
        GateConfig {
            entry_price_sats: 1000,
            payment_timeout_secs: 300,
            invoice_expiry_secs: 300,
            poll_interval_secs: 5,
            reaper_interval_secs: 60,
            collector_pubkey: "9".repeat(64),
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn zero_price_is_rejected() {
        let mut config = valid_config();
        config.entry_price_sats = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidEntryPrice)
        ));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = valid_config();
        config.payment_timeout_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidTimeout)
        ));
    }

    #[test]
    fn missing_collector_pubkey_is_rejected() {
        let mut config = valid_config();
        config.collector_pubkey = String::new();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }

    #[test]
    fn malformed_collector_pubkey_is_rejected() {
        let mut config = valid_config();
        config.collector_pubkey = "not-a-pubkey".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidCollectorPubkey)
        ));
    }

    #[test]
    fn price_schedule_carries_config_values() {
        let mut config = valid_config();
        config.entry_price_sats = 21;
        let schedule = config.price_schedule().unwrap();
        assert_eq!(schedule.entry_price_sats, 21);
        assert_eq!(schedule.payment_timeout_secs, 300);
    }

    #[test]
    fn reaper_config_carries_sweep_interval() {
        let mut config = valid_config();
        config.reaper_interval_secs = 15;
        assert_eq!(
            config.reaper_config().sweep_interval,
            std::time::Duration::from_secs(15)
        );
    }

    #[test]
    fn defaults_deserialize_when_omitted() {
        let config: GateConfig = serde_json::from_str(
            &format!(r#"{{"collector_pubkey":"{}"}}"#, "9".repeat(64)),
        )
        .unwrap();
        assert_eq!(config.entry_price_sats, 1000);
        assert_eq!(config.reaper_interval_secs, 60);
    }
}
