//! The payment intent embedded in invoices and receipts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryKey, SubmitterId, Timestamp};

/// Declaration of intent to pay for one specific entry.
///
/// Serialized into the invoice description at issuance and embedded
/// verbatim in the receipt, binding the payment to one submitter, one
/// amount, and one entry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Who is paying.
    pub submitter: SubmitterId,

    /// Amount in satoshis.
    pub amount_sats: u64,

    /// The entry this payment is for.
    pub entry_key: EntryKey,

    /// When the intent was declared.
    pub created_at: Timestamp,
}

impl PaymentIntent {
    /// Serializes the intent to its canonical JSON embedding.
    pub fn to_json(&self) -> String {
        // Serialization of this struct cannot fail: no maps, no non-string keys.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parses an embedded intent from receipt JSON.
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
