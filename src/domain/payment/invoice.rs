//! Invoices issued for pending entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SettlementRef, Timestamp};

/// Opaque handle to a payment request, owned by exactly one pending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Backend reference identifying this invoice's payment lifecycle.
    pub settlement_ref: SettlementRef,

    /// Human-readable bolt11 payment request.
    pub payment_request: String,

    /// Required amount in satoshis.
    pub amount_sats: u64,

    /// When the invoice stops being payable.
    pub expires_at: Timestamp,
}

impl Invoice {
    /// Checks whether the invoice has expired as of `now`.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }
}
