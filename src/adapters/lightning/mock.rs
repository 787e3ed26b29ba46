//! Mock invoice gateway for testing.
//!
//! Configurable settlements, error injection, and call tracking, so
//! tests can drive every branch of the admission flow without a
//! Lightning backend.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{SettlementRef, Timestamp};
use crate::domain::payment::Invoice;
use crate::ports::{
    CreateInvoiceRequest, GatewayError, InvoiceGateway, SettlementStatus,
};

/// Mock invoice gateway.
///
/// # Example
///
/// ```ignore
/// let gateway = MockInvoiceGateway::new();
/// let invoice = gateway.create_invoice(request).await?;
///
/// gateway.settle(&invoice.settlement_ref).await;
/// assert!(gateway.lookup_settlement(&invoice.settlement_ref).await?.settled);
/// ```
#[derive(Default)]
pub struct MockInvoiceGateway {
    inner: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    /// Issued invoices with their current settlement state.
    invoices: HashMap<SettlementRef, MockInvoice>,

    /// Error to return from the next `create_invoice` call.
    next_create_error: Option<GatewayError>,

    /// Error to return from the next `lookup_settlement` call.
    next_lookup_error: Option<GatewayError>,

    /// Counter feeding generated settlement references.
    issued: usize,

    /// Number of `create_invoice` calls seen.
    create_calls: usize,

    /// Number of `lookup_settlement` calls seen.
    lookup_calls: usize,
}

struct MockInvoice {
    settled: bool,
    expired: bool,
}

impl MockInvoiceGateway {
    /// Creates a gateway with no invoices and no injected errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an invoice as settled; subsequent lookups report it paid.
    pub async fn settle(&self, reference: &SettlementRef) {
        let mut state = self.inner.lock().expect("MockInvoiceGateway lock poisoned");
        if let Some(invoice) = state.invoices.get_mut(reference) {
            invoice.settled = true;
        }
    }

    /// Marks an invoice as expired on the backend side.
    pub async fn expire(&self, reference: &SettlementRef) {
        let mut state = self.inner.lock().expect("MockInvoiceGateway lock poisoned");
        if let Some(invoice) = state.invoices.get_mut(reference) {
            invoice.expired = true;
        }
    }

    /// Injects an error for the next `create_invoice` call.
    pub async fn fail_next_create(&self, error: GatewayError) {
        self.inner
            .lock()
            .expect("MockInvoiceGateway lock poisoned")
            .next_create_error = Some(error);
    }

    /// Injects an error for the next `lookup_settlement` call.
    pub async fn fail_next_lookup(&self, error: GatewayError) {
        self.inner
            .lock()
            .expect("MockInvoiceGateway lock poisoned")
            .next_lookup_error = Some(error);
    }

    /// Number of `create_invoice` calls seen.
    pub async fn create_calls(&self) -> usize {
        self.inner
            .lock()
            .expect("MockInvoiceGateway lock poisoned")
            .create_calls
    }

    /// Number of `lookup_settlement` calls seen.
    pub async fn lookup_calls(&self) -> usize {
        self.inner
            .lock()
            .expect("MockInvoiceGateway lock poisoned")
            .lookup_calls
    }
}

#[async_trait]
impl InvoiceGateway for MockInvoiceGateway {
    async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<Invoice, GatewayError> {
        let mut state = self.inner.lock().expect("MockInvoiceGateway lock poisoned");
        state.create_calls += 1;

        if let Some(error) = state.next_create_error.take() {
            return Err(error);
        }

        state.issued += 1;
        let reference = SettlementRef::new(format!("mock-hash-{}", state.issued))
            .expect("generated reference is non-empty");
        state.invoices.insert(
            reference.clone(),
            MockInvoice {
                settled: false,
                expired: false,
            },
        );

        Ok(Invoice {
            settlement_ref: reference,
            payment_request: format!("lnbcrt{}n1mock{}", request.amount_sats, state.issued),
            amount_sats: request.amount_sats,
            expires_at: Timestamp::now().plus_secs(request.expiry_secs),
        })
    }

    async fn lookup_settlement(
        &self,
        reference: &SettlementRef,
    ) -> Result<SettlementStatus, GatewayError> {
        let mut state = self.inner.lock().expect("MockInvoiceGateway lock poisoned");
        state.lookup_calls += 1;

        if let Some(error) = state.next_lookup_error.take() {
            return Err(error);
        }

        let invoice = state
            .invoices
            .get(reference)
            .ok_or(GatewayError::UnknownReference)?;

        Ok(SettlementStatus {
            settled: invoice.settled,
            expired: invoice.expired,
            proof: invoice
                .settled
                .then(|| format!("preimage-{}", reference.as_str())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            amount_sats: 1000,
            memo: "Listing entry payment: cafe".to_string(),
            description: "{}".to_string(),
            expiry_secs: 300,
            idempotency_key: None,
        }
    }

    #[tokio::test]
    async fn created_invoice_starts_unsettled() {
        let gateway = MockInvoiceGateway::new();
        let invoice = gateway.create_invoice(request()).await.unwrap();

        let status = gateway
            .lookup_settlement(&invoice.settlement_ref)
            .await
            .unwrap();
        assert!(status.is_open());
        assert!(status.proof.is_none());
    }

    #[tokio::test]
    async fn settle_flips_status_and_reveals_proof() {
        let gateway = MockInvoiceGateway::new();
        let invoice = gateway.create_invoice(request()).await.unwrap();

        gateway.settle(&invoice.settlement_ref).await;
        let status = gateway
            .lookup_settlement(&invoice.settlement_ref)
            .await
            .unwrap();

        assert!(status.settled);
        assert!(status.proof.is_some());
    }

    #[tokio::test]
    async fn unknown_reference_is_an_error() {
        let gateway = MockInvoiceGateway::new();
        let err = gateway
            .lookup_settlement(&SettlementRef::new("nope").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::UnknownReference));
    }

    #[tokio::test]
    async fn injected_create_error_fires_once() {
        let gateway = MockInvoiceGateway::new();
        gateway
            .fail_next_create(GatewayError::Unreachable("down".into()))
            .await;

        assert!(gateway.create_invoice(request()).await.is_err());
        assert!(gateway.create_invoice(request()).await.is_ok());
        assert_eq!(gateway.create_calls().await, 2);
    }

    #[tokio::test]
    async fn references_are_unique_per_invoice() {
        let gateway = MockInvoiceGateway::new();
        let a = gateway.create_invoice(request()).await.unwrap();
        let b = gateway.create_invoice(request()).await.unwrap();
        assert_ne!(a.settlement_ref, b.settlement_ref);
    }
}
