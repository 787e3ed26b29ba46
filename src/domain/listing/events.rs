//! Gate notifications for external logging and analytics.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryKey, SettlementRef, SubmitterId, Timestamp};

/// How an entry was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdmissionPath {
    /// Submitter was in the web of trust.
    Trusted,
    /// Payment confirmed for this entry key.
    Paid,
}

/// Notification emitted by the admission controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GateEvent {
    /// An entry was admitted to the public store.
    EntryAdmitted {
        entry_key: EntryKey,
        submitter: SubmitterId,
        path: AdmissionPath,
        at: Timestamp,
    },

    /// A payment was confirmed for a pending entry.
    PaymentConfirmed {
        entry_key: EntryKey,
        settlement_ref: SettlementRef,
        amount_sats: u64,
        at: Timestamp,
    },

    /// A pending entry timed out and was reclaimed.
    PaymentExpired {
        entry_key: EntryKey,
        submitter: SubmitterId,
        at: Timestamp,
    },

    /// A submitter was admitted on trust alone.
    TrustGranted {
        submitter: SubmitterId,
        entry_key: EntryKey,
        at: Timestamp,
    },
}

impl GateEvent {
    /// Stable event-type string, used for routing and filtering.
    pub fn event_type(&self) -> &'static str {
        match self {
            GateEvent::EntryAdmitted { .. } => "entry.admitted",
            GateEvent::PaymentConfirmed { .. } => "payment.confirmed",
            GateEvent::PaymentExpired { .. } => "payment.expired",
            GateEvent::TrustGranted { .. } => "trust.granted",
        }
    }

    /// The entry key this event concerns.
    pub fn entry_key(&self) -> &EntryKey {
        match self {
            GateEvent::EntryAdmitted { entry_key, .. }
            | GateEvent::PaymentConfirmed { entry_key, .. }
            | GateEvent::PaymentExpired { entry_key, .. }
            | GateEvent::TrustGranted { entry_key, .. } => entry_key,
        }
    }
}
