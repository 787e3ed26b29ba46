//! LNbits-backed invoice gateway.
//!
//! Talks to an LNbits instance over its REST API: `POST
//! /api/v1/payments` to create invoices, `GET
//! /api/v1/payments/{payment_hash}` to check settlement. The invoice
//! key is sent as `X-Api-Key` and held in a `SecretString` so it never
//! reaches logs.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SettlementRef, Timestamp};
use crate::domain::payment::Invoice;
use crate::ports::{
    CreateInvoiceRequest, GatewayError, InvoiceGateway, SettlementStatus,
};

/// Configuration for an LNbits backend.
#[derive(Debug, Clone)]
pub struct LnbitsConfig {
    /// Base URL of the LNbits instance.
    pub base_url: String,

    /// Wallet invoice key.
    pub api_key: SecretString,
}

impl LnbitsConfig {
    /// Creates a config for the given instance and invoice key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: SecretString::new(api_key.into()),
        }
    }
}

/// Invoice gateway backed by LNbits.
pub struct LnbitsGateway {
    config: LnbitsConfig,
    http_client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CreatePaymentBody<'a> {
    out: bool,
    amount: u64,
    memo: &'a str,
    /// Raw description the backend hashes into the invoice; commits the
    /// payment to the embedded intent.
    unhashed_description: String,
    expiry: u64,
}

#[derive(Debug, Deserialize)]
struct CreatePaymentResponse {
    payment_hash: String,
    payment_request: String,
}

#[derive(Debug, Deserialize)]
struct PaymentStatusResponse {
    paid: bool,
    #[serde(default)]
    preimage: Option<String>,
}

impl LnbitsGateway {
    /// Creates a gateway for the configured LNbits instance.
    pub fn new(config: LnbitsConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn payments_url(&self) -> String {
        format!("{}/api/v1/payments", self.config.base_url)
    }

    fn payment_url(&self, reference: &SettlementRef) -> String {
        format!("{}/api/v1/payments/{}", self.config.base_url, reference)
    }

    async fn map_error_status(response: reqwest::Response) -> GatewayError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(%status, %body, "LNbits request failed");

        match status.as_u16() {
            401 | 403 => GatewayError::Unauthorized,
            404 => GatewayError::UnknownReference,
            400..=499 => GatewayError::Rejected(body),
            _ => GatewayError::Unreachable(format!("LNbits answered {}", status)),
        }
    }
}

#[async_trait]
impl InvoiceGateway for LnbitsGateway {
    async fn create_invoice(
        &self,
        request: CreateInvoiceRequest,
    ) -> Result<Invoice, GatewayError> {
        let body = CreatePaymentBody {
            out: false,
            amount: request.amount_sats,
            memo: &request.memo,
            unhashed_description: hex::encode(request.description.as_bytes()),
            expiry: request.expiry_secs,
        };

        let response = self
            .http_client
            .post(self.payments_url())
            .header("X-Api-Key", self.config.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::map_error_status(response).await);
        }

        let created: CreatePaymentResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        let settlement_ref = SettlementRef::new(created.payment_hash)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(Invoice {
            settlement_ref,
            payment_request: created.payment_request,
            amount_sats: request.amount_sats,
            expires_at: Timestamp::now().plus_secs(request.expiry_secs),
        })
    }

    async fn lookup_settlement(
        &self,
        reference: &SettlementRef,
    ) -> Result<SettlementStatus, GatewayError> {
        let response = self
            .http_client
            .get(self.payment_url(reference))
            .header("X-Api-Key", self.config.api_key.expose_secret())
            .send()
            .await
            .map_err(|e| GatewayError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::map_error_status(response).await);
        }

        let status: PaymentStatusResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        // LNbits does not report expiry here; the poller tracks the
        // invoice deadline itself.
        Ok(SettlementStatus {
            settled: status.paid,
            expired: false,
            proof: status.preimage,
        })
    }
}
