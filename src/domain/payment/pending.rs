//! Pending entries and their lifecycle states.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryKey, SubmitterId, Timestamp, ValidationError};
use crate::domain::listing::SubmissionRequest;

use super::{Invoice, PaymentIntent};

/// Lifecycle state of a pending entry.
///
/// Transitions are monotonic: `Submitted -> InvoiceIssued -> Confirmed`
/// on the happy path, with expiry possible from either non-terminal
/// state. There are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryState {
    /// Awaiting an invoice request.
    Submitted,
    /// Invoice issued, awaiting settlement.
    InvoiceIssued,
    /// Payment confirmed; the entry is being admitted.
    Confirmed,
    /// Timed out without confirmation.
    Expired,
}

impl EntryState {
    /// Returns true if a transition from self to `target` is valid.
    pub fn can_transition_to(&self, target: EntryState) -> bool {
        use EntryState::*;
        matches!(
            (self, target),
            (Submitted, InvoiceIssued)
                | (Submitted, Expired)
                | (InvoiceIssued, Confirmed)
                | (InvoiceIssued, Expired)
        )
    }

    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntryState::Confirmed | EntryState::Expired)
    }
}

/// Mutable record tracking one submission through payment.
///
/// Exactly one may exist per entry key at any time; the store enforces
/// that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEntry {
    /// The original submission.
    pub request: SubmissionRequest,

    /// Current lifecycle state.
    pub state: EntryState,

    /// Invoice, present from `InvoiceIssued` onward.
    pub invoice: Option<Invoice>,

    /// Intent serialized into the invoice description, present from
    /// `InvoiceIssued` onward.
    pub intent: Option<PaymentIntent>,

    /// When the submission arrived at the gate.
    pub arrived_at: Timestamp,

    /// When the entry last changed state.
    pub last_transition: Timestamp,
}

impl PendingEntry {
    /// Creates a new pending entry in `Submitted`.
    pub fn new(request: SubmissionRequest, now: Timestamp) -> Self {
        Self {
            request,
            state: EntryState::Submitted,
            invoice: None,
            intent: None,
            arrived_at: now,
            last_transition: now,
        }
    }

    /// The entry key of this record.
    pub fn entry_key(&self) -> &EntryKey {
        &self.request.entry_key
    }

    /// The submitter that owns this record.
    pub fn submitter(&self) -> &SubmitterId {
        &self.request.submitter
    }

    /// Attaches an invoice and moves to `InvoiceIssued`.
    ///
    /// The amount is frozen by the attached invoice; no later mutation
    /// of the price is possible.
    pub fn issue_invoice(
        &mut self,
        invoice: Invoice,
        intent: PaymentIntent,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        self.transition(EntryState::InvoiceIssued, now)?;
        self.invoice = Some(invoice);
        self.intent = Some(intent);
        Ok(())
    }

    /// Moves to the target state if the transition is valid.
    pub fn transition(
        &mut self,
        target: EntryState,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        if !self.state.can_transition_to(target) {
            return Err(ValidationError::invalid_format(
                "state",
                format!("cannot transition from {:?} to {:?}", self.state, target),
            ));
        }
        self.state = target;
        self.last_transition = now;
        Ok(())
    }

    /// Whether this entry's deadline has passed as of `now`.
    pub fn is_expired(&self, now: Timestamp, timeout_secs: u64) -> bool {
        now.secs_since(&self.last_transition) > timeout_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SettlementRef;
    use crate::domain::listing::Category;

    fn request() -> SubmissionRequest {
        SubmissionRequest {
            submitter: SubmitterId::new("a".repeat(64)).unwrap(),
            entry_key: EntryKey::new("cafe-nine").unwrap(),
            title: "Cafe Nine".to_string(),
            summary: "Espresso bar near the docks".to_string(),
            description: "Single-origin espresso, open early, sats accepted.".to_string(),
            category: Category::Business,
            location: None,
            website: None,
            contact: None,
            created_at: Timestamp::from_unix_secs(100),
        }
    }

    fn invoice() -> Invoice {
        Invoice {
            settlement_ref: SettlementRef::new("hash1").unwrap(),
            payment_request: "lnbc...".to_string(),
            amount_sats: 1000,
            expires_at: Timestamp::from_unix_secs(400),
        }
    }

    fn intent() -> PaymentIntent {
        PaymentIntent {
            submitter: SubmitterId::new("a".repeat(64)).unwrap(),
            amount_sats: 1000,
            entry_key: EntryKey::new("cafe-nine").unwrap(),
            created_at: Timestamp::from_unix_secs(100),
        }
    }

    #[test]
    fn new_entry_starts_submitted() {
        let entry = PendingEntry::new(request(), Timestamp::from_unix_secs(100));
        assert_eq!(entry.state, EntryState::Submitted);
        assert!(entry.invoice.is_none());
    }

    #[test]
    fn issue_invoice_moves_to_invoice_issued() {
        let mut entry = PendingEntry::new(request(), Timestamp::from_unix_secs(100));
        entry
            .issue_invoice(invoice(), intent(), Timestamp::from_unix_secs(110))
            .unwrap();

        assert_eq!(entry.state, EntryState::InvoiceIssued);
        assert!(entry.invoice.is_some());
        assert_eq!(entry.last_transition, Timestamp::from_unix_secs(110));
    }

    #[test]
    fn confirmed_is_reachable_only_from_invoice_issued() {
        let mut entry = PendingEntry::new(request(), Timestamp::from_unix_secs(100));
        assert!(entry
            .transition(EntryState::Confirmed, Timestamp::from_unix_secs(110))
            .is_err());

        entry
            .issue_invoice(invoice(), intent(), Timestamp::from_unix_secs(110))
            .unwrap();
        assert!(entry
            .transition(EntryState::Confirmed, Timestamp::from_unix_secs(120))
            .is_ok());
    }

    #[test]
    fn no_backward_transitions() {
        let mut entry = PendingEntry::new(request(), Timestamp::from_unix_secs(100));
        entry
            .issue_invoice(invoice(), intent(), Timestamp::from_unix_secs(110))
            .unwrap();
        assert!(entry
            .transition(EntryState::Submitted, Timestamp::from_unix_secs(120))
            .is_err());
    }

    #[test]
    fn terminal_states_admit_no_transitions() {
        for terminal in [EntryState::Confirmed, EntryState::Expired] {
            assert!(terminal.is_terminal());
            for target in [
                EntryState::Submitted,
                EntryState::InvoiceIssued,
                EntryState::Confirmed,
                EntryState::Expired,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn expiry_can_happen_before_invoice() {
        let mut entry = PendingEntry::new(request(), Timestamp::from_unix_secs(100));
        assert!(entry
            .transition(EntryState::Expired, Timestamp::from_unix_secs(500))
            .is_ok());
    }

    #[test]
    fn is_expired_compares_against_last_transition() {
        let mut entry = PendingEntry::new(request(), Timestamp::from_unix_secs(100));
        entry
            .issue_invoice(invoice(), intent(), Timestamp::from_unix_secs(200))
            .unwrap();

        // 300 seconds timeout from the transition at t=200.
        assert!(!entry.is_expired(Timestamp::from_unix_secs(500), 300));
        assert!(entry.is_expired(Timestamp::from_unix_secs(501), 300));
    }
}
