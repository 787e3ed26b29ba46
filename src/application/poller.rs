//! Per-entry settlement polling.
//!
//! Each issued invoice gets one poll task that periodically asks the
//! gateway whether the invoice settled. The task is bound to its
//! entry's lifetime: removal of the entry from the store (by a pushed
//! receipt, a winning poll, or the reaper) is the cancellation signal,
//! checked before every gateway call.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::domain::foundation::{SettlementRef, Timestamp};
use crate::domain::payment::EntryState;
use crate::ports::GatewayError;

use super::controller::EntryAdmissionController;

/// Spawns the settlement poll loop for one invoice.
///
/// The loop terminates on the first of: settlement observed, invoice
/// expiry reached, or the entry no longer awaiting settlement.
pub(crate) fn spawn_settlement_poll(
    controller: EntryAdmissionController,
    reference: SettlementRef,
    expires_at: Timestamp,
    poll_interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(poll_interval);
        // The first tick completes immediately; consume it so the loop
        // waits a full interval before the first lookup.
        interval.tick().await;

        loop {
            interval.tick().await;

            // Cheap cancellation: never poll a resolved or removed entry.
            match controller.store().find_by_settlement(&reference).await {
                Some(entry) if entry.state == EntryState::InvoiceIssued => {}
                _ => {
                    tracing::debug!(settlement_ref = %reference, "entry resolved, stopping settlement poll");
                    return;
                }
            }

            if Timestamp::now().is_after(&expires_at) {
                tracing::debug!(settlement_ref = %reference, "invoice expired, stopping settlement poll");
                return;
            }

            match controller.gateway().lookup_settlement(&reference).await {
                Ok(status) if status.settled => {
                    controller.on_settlement_observed(&reference).await;
                    return;
                }
                Ok(status) if status.expired => {
                    tracing::debug!(settlement_ref = %reference, "invoice reported expired by backend");
                    return;
                }
                Ok(_) => {}
                Err(GatewayError::UnknownReference) => {
                    tracing::warn!(settlement_ref = %reference, "backend lost the invoice, stopping settlement poll");
                    return;
                }
                Err(e) => {
                    // Transient; the next tick retries.
                    tracing::debug!(settlement_ref = %reference, error = %e, "settlement lookup failed");
                }
            }
        }
    })
}
