//! The price schedule: what admission costs and how long payment may take.

use std::time::Duration;

use crate::domain::foundation::SubmitterId;

/// Immutable payment configuration for the gate.
///
/// Constructed once at service start; every pending entry is priced and
/// timed against the same schedule.
#[derive(Debug, Clone)]
pub struct PriceSchedule {
    /// Required payment amount in satoshis.
    pub entry_price_sats: u64,

    /// Seconds a pending entry may sit without confirmation before the
    /// reaper reclaims it.
    pub payment_timeout_secs: u64,

    /// Seconds until an issued invoice expires.
    pub invoice_expiry_secs: u64,

    /// How long the settlement poller sleeps between lookups.
    pub poll_interval: Duration,

    /// The payment-collecting identity; receipts must be issued by it.
    pub collector: SubmitterId,
}

impl PriceSchedule {
    /// Creates a schedule with the default price and timing.
    pub fn new(collector: SubmitterId) -> Self {
        Self {
            entry_price_sats: 1000,
            payment_timeout_secs: 300,
            invoice_expiry_secs: 300,
            poll_interval: Duration::from_secs(5),
            collector,
        }
    }

    /// Sets the entry price.
    pub fn with_price_sats(mut self, sats: u64) -> Self {
        self.entry_price_sats = sats;
        self
    }

    /// Sets the payment timeout.
    pub fn with_payment_timeout_secs(mut self, secs: u64) -> Self {
        self.payment_timeout_secs = secs;
        self
    }

    /// Sets the invoice expiry.
    pub fn with_invoice_expiry_secs(mut self, secs: u64) -> Self {
        self.invoice_expiry_secs = secs;
        self
    }

    /// Sets the settlement poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}
