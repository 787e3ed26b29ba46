//! Receipt validation: binding a payment proof to its entry.

use thiserror::Error;

use crate::domain::foundation::{EntryKey, SubmitterId};

use super::{PaymentIntent, PaymentReceipt};

/// Reasons a receipt fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReceiptError {
    #[error("receipt not issued by the payment collector")]
    WrongIssuer,

    #[error("embedded payment intent is not parseable: {0}")]
    MalformedProof(String),

    #[error("embedded intent submitter does not match the pending entry")]
    IdentityMismatch,

    #[error("embedded intent amount {got} does not equal the required {expected}")]
    AmountMismatch { expected: u64, got: u64 },

    #[error("embedded intent references a different entry")]
    EntryMismatch,
}

/// Pure validator binding a receipt to the original payment request.
///
/// Five checks, applied in order, short-circuiting on the first failure:
/// issuer, embedding parseability, submitter identity, exact amount,
/// entry key. Cryptographic verification of the receipt's signature is
/// the transport's concern, not this validator's.
#[derive(Debug, Clone)]
pub struct ReceiptValidator {
    /// The configured payment-collecting identity.
    collector: SubmitterId,

    /// The required payment amount in satoshis.
    price_sats: u64,
}

impl ReceiptValidator {
    /// Creates a validator for the given collector and price.
    pub fn new(collector: SubmitterId, price_sats: u64) -> Self {
        Self {
            collector,
            price_sats,
        }
    }

    /// Validates `receipt` against the intent recorded for `entry_key`.
    pub fn validate(
        &self,
        receipt: &PaymentReceipt,
        original_intent: &PaymentIntent,
        entry_key: &EntryKey,
    ) -> Result<(), ReceiptError> {
        if receipt.issuer != self.collector {
            return Err(ReceiptError::WrongIssuer);
        }

        let embedded = receipt
            .embedded_intent()
            .map_err(|e| ReceiptError::MalformedProof(e.to_string()))?;

        if embedded.submitter != original_intent.submitter {
            return Err(ReceiptError::IdentityMismatch);
        }

        if embedded.amount_sats != self.price_sats {
            return Err(ReceiptError::AmountMismatch {
                expected: self.price_sats,
                got: embedded.amount_sats,
            });
        }

        if embedded.entry_key != *entry_key {
            return Err(ReceiptError::EntryMismatch);
        }

        Ok(())
    }
}
