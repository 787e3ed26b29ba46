//! Payment receipts.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryKey, SettlementRef, SubmitterId};

use super::PaymentIntent;

/// Proof that a specific invoice was paid.
///
/// Carries an embedded copy of the original payment intent; the
/// referenced entry key is derived from that embedding, never trusted
/// from any outer field. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// Identity that issued the receipt. Must be the configured
    /// payment-collecting identity to be accepted.
    pub issuer: SubmitterId,

    /// Backend reference for the paid invoice.
    pub settlement_ref: SettlementRef,

    /// Amount paid in satoshis.
    pub amount_sats: u64,

    /// The original payment intent, embedded as JSON.
    pub intent_json: String,
}

impl PaymentReceipt {
    /// Parses the embedded intent.
    pub fn embedded_intent(&self) -> Result<PaymentIntent, serde_json::Error> {
        PaymentIntent::parse(&self.intent_json)
    }

    /// The entry key this receipt claims to pay for, from the embedding.
    pub fn entry_key(&self) -> Option<EntryKey> {
        self.embedded_intent().ok().map(|intent| intent.entry_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Timestamp;

    fn receipt_for(intent: &PaymentIntent) -> PaymentReceipt {
        PaymentReceipt {
            issuer: SubmitterId::new("9".repeat(64)).unwrap(),
            settlement_ref: SettlementRef::new("hash1").unwrap(),
            amount_sats: intent.amount_sats,
            intent_json: intent.to_json(),
        }
    }

    #[test]
    fn entry_key_is_derived_from_embedded_intent() {
        let intent = PaymentIntent {
            submitter: SubmitterId::new("a".repeat(64)).unwrap(),
            amount_sats: 1000,
            entry_key: EntryKey::new("cafe-nine").unwrap(),
            created_at: Timestamp::from_unix_secs(1),
        };
        let receipt = receipt_for(&intent);
        assert_eq!(receipt.entry_key(), Some(intent.entry_key));
    }

    #[test]
    fn entry_key_is_none_for_malformed_embedding() {
        let receipt = PaymentReceipt {
            issuer: SubmitterId::new("9".repeat(64)).unwrap(),
            settlement_ref: SettlementRef::new("hash1").unwrap(),
            amount_sats: 1000,
            intent_json: "{broken".to_string(),
        };
        assert_eq!(receipt.entry_key(), None);
    }
}
