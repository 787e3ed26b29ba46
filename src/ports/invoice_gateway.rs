//! Invoice gateway port for the Lightning payment backend.
//!
//! The gateway creates invoices and reports settlement on demand; it
//! never settles payments itself. Implementations are expected to be
//! remote (REST node APIs), so every error carries a retryability hint.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::domain::foundation::SettlementRef;
use crate::domain::payment::Invoice;

/// Request to create an invoice scoped to one pending entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Amount in satoshis.
    pub amount_sats: u64,

    /// Short human-readable memo shown in wallets.
    pub memo: String,

    /// The serialized payment intent this invoice is bound to. Backends
    /// that support description hashing commit to `description_hash()`
    /// of this value.
    pub description: String,

    /// Seconds until the invoice expires.
    pub expiry_secs: u64,

    /// Idempotency key for safe retries.
    pub idempotency_key: Option<String>,
}

impl CreateInvoiceRequest {
    /// SHA-256 of the description binding, hex encoded.
    pub fn description_hash(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.description.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Settlement state of one invoice, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementStatus {
    /// The invoice has been paid.
    pub settled: bool,

    /// The invoice can no longer be paid.
    pub expired: bool,

    /// Payment preimage, when settled and the backend reveals it.
    pub proof: Option<String>,
}

impl SettlementStatus {
    /// Still payable: neither settled nor expired.
    pub fn is_open(&self) -> bool {
        !self.settled && !self.expired
    }
}

/// Errors from invoice gateway operations.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The backend could not be reached.
    #[error("payment backend unreachable: {0}")]
    Unreachable(String),

    /// The backend rejected our credentials.
    #[error("payment backend rejected credentials")]
    Unauthorized,

    /// The backend rejected the request.
    #[error("payment backend rejected request: {0}")]
    Rejected(String),

    /// The backend answered with something unparseable.
    #[error("unexpected payment backend response: {0}")]
    InvalidResponse(String),

    /// No invoice exists for the queried reference.
    #[error("unknown settlement reference")]
    UnknownReference,
}

impl GatewayError {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Unreachable(_))
    }
}

/// Port for invoice creation and settlement lookup.
#[async_trait]
pub trait InvoiceGateway: Send + Sync {
    /// Creates an invoice for the given amount and description binding.
    async fn create_invoice(&self, request: CreateInvoiceRequest)
        -> Result<Invoice, GatewayError>;

    /// Reports the settlement state of a previously created invoice.
    async fn lookup_settlement(
        &self,
        reference: &SettlementRef,
    ) -> Result<SettlementStatus, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_gateway_is_object_safe() {
        fn _accepts_dyn(_gateway: &dyn InvoiceGateway) {}
    }

    #[test]
    fn description_hash_is_stable_hex_sha256() {
        let request = CreateInvoiceRequest {
            amount_sats: 1000,
            memo: "listing".to_string(),
            description: "hello".to_string(),
            expiry_secs: 300,
            idempotency_key: None,
        };
        assert_eq!(
            request.description_hash(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn unreachable_is_retryable_rejected_is_not() {
        assert!(GatewayError::Unreachable("timeout".into()).is_retryable());
        assert!(!GatewayError::Rejected("bad amount".into()).is_retryable());
        assert!(!GatewayError::Unauthorized.is_retryable());
    }

    #[test]
    fn settlement_status_is_open_when_neither_settled_nor_expired() {
        let open = SettlementStatus {
            settled: false,
            expired: false,
            proof: None,
        };
        assert!(open.is_open());

        let settled = SettlementStatus {
            settled: true,
            expired: false,
            proof: Some("preimage".into()),
        };
        assert!(!settled.is_open());
    }
}
