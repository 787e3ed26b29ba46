//! The entry admission controller: the gate's concurrent state machine.
//!
//! Tracks each submission from arrival through trust check, invoice
//! issuance, payment confirmation, and final admission or expiry. Two
//! independent confirmation paths (settlement polling and pushed
//! receipts) and the expiry reaper race against the same pending
//! records; the store's compare-and-transition operations guarantee a
//! single winner per entry. External collaborators are never called
//! while a store lock is held.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::foundation::{
    EntryKey, ErrorCode, SettlementRef, SubmitterId, Timestamp, ValidationError,
};
use crate::domain::listing::{AdmissionPath, AdmittedRecord, GateEvent, SubmissionRequest};
use crate::domain::payment::{
    EntryState, Invoice, PaymentIntent, PaymentReceipt, PendingEntry, ReceiptValidator,
};
use crate::ports::{
    AdmissionSink, CreateInvoiceRequest, GateObserver, GatewayError, InvoiceGateway, SinkError,
    TrustOracle,
};

use super::poller::spawn_settlement_poll;
use super::schedule::PriceSchedule;
use super::store::PendingEntryStore;

/// Result of a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The entry was admitted to the public store.
    Admitted,

    /// Payment of the given amount is required before admission.
    PaymentRequired { amount_sats: u64 },
}

/// Rejections surfaced by [`EntryAdmissionController::submit`].
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Structurally malformed submission; not retried automatically.
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    /// The request names a submitter other than the authenticated one.
    #[error("submission submitter does not match the authenticated identity")]
    IdentityMismatch,

    /// Another submission already holds this entry key.
    #[error("an entry with this key is already pending")]
    DuplicateEntry,

    /// The admitted record could not be handed to the event store;
    /// retryable, and the payment (if any) stays settled.
    #[error("failed to publish admitted record: {0}")]
    PublishFailed(#[from] SinkError),
}

/// Failures surfaced by [`EntryAdmissionController::request_invoice`].
#[derive(Debug, Error)]
pub enum InvoiceRequestError {
    /// No entry with this key is awaiting an invoice.
    #[error("no pending entry awaiting an invoice for this key")]
    NoSuchPendingEntry,

    /// The declared amount does not equal the configured price exactly.
    #[error("intent amount {got} does not equal the required {expected}")]
    AmountMismatch { expected: u64, got: u64 },

    /// The payment backend failed; the entry stays in `Submitted` and
    /// the request may be retried.
    #[error("invoice creation failed: {0}")]
    InvoiceCreationFailed(#[source] GatewayError),
}

/// Orchestrates the submission lifecycle.
///
/// Cheap to clone; clones share the store and collaborators.
#[derive(Clone)]
pub struct EntryAdmissionController {
    schedule: PriceSchedule,
    store: Arc<PendingEntryStore>,
    trust: Arc<dyn TrustOracle>,
    gateway: Arc<dyn InvoiceGateway>,
    sink: Arc<dyn AdmissionSink>,
    observer: Arc<dyn GateObserver>,
    validator: ReceiptValidator,
}

impl EntryAdmissionController {
    /// Creates a controller over the given collaborators.
    pub fn new(
        schedule: PriceSchedule,
        store: Arc<PendingEntryStore>,
        trust: Arc<dyn TrustOracle>,
        gateway: Arc<dyn InvoiceGateway>,
        sink: Arc<dyn AdmissionSink>,
        observer: Arc<dyn GateObserver>,
    ) -> Self {
        let validator =
            ReceiptValidator::new(schedule.collector.clone(), schedule.entry_price_sats);
        Self {
            schedule,
            store,
            trust,
            gateway,
            sink,
            observer,
            validator,
        }
    }

    /// The schedule this controller admits against.
    pub fn schedule(&self) -> &PriceSchedule {
        &self.schedule
    }

    /// The pending-entry store this controller mutates through.
    pub fn store(&self) -> &Arc<PendingEntryStore> {
        &self.store
    }

    pub(crate) fn gateway(&self) -> &Arc<dyn InvoiceGateway> {
        &self.gateway
    }

    /// Handles an incoming submission.
    ///
    /// Trusted submitters are admitted immediately, with no pending
    /// entry. Untrusted submitters whose key already settled are
    /// admitted without re-charging. Everyone else gets a pending entry
    /// and a price.
    pub async fn submit(
        &self,
        request: SubmissionRequest,
        identity: &SubmitterId,
    ) -> Result<SubmitOutcome, SubmitError> {
        request.validate()?;

        if request.submitter != *identity {
            return Err(SubmitError::IdentityMismatch);
        }

        if self.trust.is_trusted(identity).await {
            self.admit_now(&request, AdmissionPath::Trusted).await?;
            return Ok(SubmitOutcome::Admitted);
        }

        if self.store.is_settled(&request.entry_key).await {
            // Resubmission after payment: admit without re-charging.
            self.admit_now(&request, AdmissionPath::Paid).await?;
            return Ok(SubmitOutcome::Admitted);
        }

        let entry = PendingEntry::new(request, Timestamp::now());
        self.store.insert_submitted(entry).await.map_err(|e| {
            debug_assert_eq!(e.code, ErrorCode::DuplicateEntry);
            SubmitError::DuplicateEntry
        })?;

        Ok(SubmitOutcome::PaymentRequired {
            amount_sats: self.schedule.entry_price_sats,
        })
    }

    /// Issues an invoice for a pending entry.
    ///
    /// The declared amount must equal the configured price exactly;
    /// mismatches never reach the payment backend. On success the entry
    /// moves to `InvoiceIssued` and a settlement poll starts for it.
    pub async fn request_invoice(
        &self,
        entry_key: &EntryKey,
        intent_amount_sats: u64,
    ) -> Result<Invoice, InvoiceRequestError> {
        let entry = match self.store.get(entry_key).await {
            Some(entry) if entry.state == EntryState::Submitted => entry,
            _ => return Err(InvoiceRequestError::NoSuchPendingEntry),
        };

        if intent_amount_sats != self.schedule.entry_price_sats {
            return Err(InvoiceRequestError::AmountMismatch {
                expected: self.schedule.entry_price_sats,
                got: intent_amount_sats,
            });
        }

        let now = Timestamp::now();
        let intent = PaymentIntent {
            submitter: entry.submitter().clone(),
            amount_sats: intent_amount_sats,
            entry_key: entry_key.clone(),
            created_at: now,
        };

        let invoice = self
            .gateway
            .create_invoice(CreateInvoiceRequest {
                amount_sats: intent_amount_sats,
                memo: invoice_memo(entry_key),
                description: intent.to_json(),
                expiry_secs: self.schedule.invoice_expiry_secs,
                idempotency_key: Some(Uuid::new_v4().to_string()),
            })
            .await
            .map_err(InvoiceRequestError::InvoiceCreationFailed)?;

        if let Err(e) = self
            .store
            .attach_invoice(entry_key, invoice.clone(), intent, Timestamp::now())
            .await
        {
            // The entry was resolved or replaced while the gateway call
            // was in flight; the created invoice is left to expire.
            tracing::warn!(entry_key = %entry_key, error = %e, "entry vanished during invoice creation");
            return Err(InvoiceRequestError::NoSuchPendingEntry);
        }

        tracing::info!(
            entry_key = %entry_key,
            settlement_ref = %invoice.settlement_ref,
            amount_sats = intent_amount_sats,
            "invoice issued"
        );

        spawn_settlement_poll(
            self.clone(),
            invoice.settlement_ref.clone(),
            invoice.expires_at,
            self.schedule.poll_interval,
        );

        Ok(invoice)
    }

    /// Accepts a pushed payment receipt. Fire-and-forget: malformed,
    /// unknown, late, duplicate, and invalid receipts are logged and
    /// ignored — the entry's outcome was or will be decided elsewhere.
    pub async fn deliver_receipt(&self, receipt: PaymentReceipt) {
        let Some(entry_key) = receipt.entry_key() else {
            tracing::debug!("ignoring receipt with unparseable intent embedding");
            return;
        };

        let Some(entry) = self.store.get(&entry_key).await else {
            tracing::debug!(entry_key = %entry_key, "ignoring receipt for unknown or resolved entry");
            return;
        };

        if entry.state != EntryState::InvoiceIssued {
            tracing::debug!(entry_key = %entry_key, state = ?entry.state, "ignoring receipt for entry not awaiting settlement");
            return;
        }

        let Some(intent) = entry.intent.as_ref() else {
            tracing::warn!(entry_key = %entry_key, "entry in InvoiceIssued without an intent");
            return;
        };

        if let Err(reason) = self.validator.validate(&receipt, intent, &entry_key) {
            tracing::warn!(entry_key = %entry_key, %reason, "rejecting invalid receipt");
            return;
        }

        self.confirm(&entry_key, &receipt.settlement_ref).await;
    }

    /// Settlement observed by the poll loop. No-op unless the entry is
    /// still awaiting settlement, so a late poll result cannot
    /// double-admit behind a receipt.
    pub(crate) async fn on_settlement_observed(&self, reference: &SettlementRef) {
        let now = Timestamp::now();
        let Some(entry) = self
            .store
            .take_confirmed_by_settlement(reference, now)
            .await
        else {
            tracing::debug!(settlement_ref = %reference, "settlement for already-resolved entry");
            return;
        };
        self.finish_admission(entry, reference.clone(), now).await;
    }

    /// Reclaims every pending entry whose deadline passed. Returns the
    /// number of entries reclaimed.
    pub async fn reclaim_expired(&self, now: Timestamp) -> usize {
        let reclaimed = self
            .store
            .reclaim_expired(now, self.schedule.payment_timeout_secs)
            .await;

        for entry in &reclaimed {
            tracing::info!(entry_key = %entry.entry_key(), "pending entry expired");
            self.observer
                .notify(GateEvent::PaymentExpired {
                    entry_key: entry.entry_key().clone(),
                    submitter: entry.submitter().clone(),
                    at: now,
                })
                .await;
        }
        reclaimed.len()
    }

    /// Receipt-path confirmation: one compare-and-transition decides
    /// the winner between racing receipts, polls, and the reaper.
    async fn confirm(&self, entry_key: &EntryKey, reference: &SettlementRef) {
        let now = Timestamp::now();
        let Some(entry) = self.store.take_confirmed(entry_key, now).await else {
            tracing::debug!(entry_key = %entry_key, "confirmation lost the race, entry already resolved");
            return;
        };
        self.finish_admission(entry, reference.clone(), now).await;
    }

    /// Post-confirmation admission, outside any store lock.
    async fn finish_admission(&self, entry: PendingEntry, reference: SettlementRef, now: Timestamp) {
        let entry_key = entry.entry_key().clone();

        self.observer
            .notify(GateEvent::PaymentConfirmed {
                entry_key: entry_key.clone(),
                settlement_ref: reference,
                amount_sats: self.schedule.entry_price_sats,
                at: now,
            })
            .await;

        let record = AdmittedRecord::from_request(&entry.request, now);
        match self.sink.publish(&record).await {
            Ok(()) => {
                tracing::info!(entry_key = %entry_key, "entry admitted after payment");
                self.observer
                    .notify(GateEvent::EntryAdmitted {
                        entry_key,
                        submitter: entry.request.submitter.clone(),
                        path: AdmissionPath::Paid,
                        at: now,
                    })
                    .await;
            }
            Err(e) => {
                // The key is already recorded settled: resubmission
                // re-admits without re-charging.
                tracing::warn!(entry_key = %entry_key, error = %e, "publish failed after payment");
            }
        }
    }

    /// Immediate admission for trusted submitters and settled keys.
    async fn admit_now(
        &self,
        request: &SubmissionRequest,
        path: AdmissionPath,
    ) -> Result<(), SinkError> {
        let now = Timestamp::now();
        let record = AdmittedRecord::from_request(request, now);
        self.sink.publish(&record).await?;

        if path == AdmissionPath::Trusted {
            tracing::info!(submitter = %request.submitter, entry_key = %request.entry_key, "trusted submitter admitted");
            self.observer
                .notify(GateEvent::TrustGranted {
                    submitter: request.submitter.clone(),
                    entry_key: request.entry_key.clone(),
                    at: now,
                })
                .await;
        }

        self.observer
            .notify(GateEvent::EntryAdmitted {
                entry_key: request.entry_key.clone(),
                submitter: request.submitter.clone(),
                path,
                at: now,
            })
            .await;
        Ok(())
    }
}

/// Wallet-visible memo for an entry's invoice.
fn invoice_memo(entry_key: &EntryKey) -> String {
    let key = entry_key.as_str();
    if key.chars().count() > 24 {
        let prefix: String = key.chars().take(24).collect();
        format!("Listing entry payment: {}...", prefix)
    } else {
        format!("Listing entry payment: {}", key)
    }
}
