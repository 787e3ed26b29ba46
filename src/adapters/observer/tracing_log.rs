//! Observer logging every notification through `tracing`.

use async_trait::async_trait;

use crate::domain::listing::GateEvent;
use crate::ports::GateObserver;

/// Default observer: one structured log line per notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates the observer.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GateObserver for TracingObserver {
    async fn notify(&self, event: GateEvent) {
        match &event {
            GateEvent::EntryAdmitted {
                entry_key,
                submitter,
                path,
                ..
            } => {
                tracing::info!(event = event.event_type(), %entry_key, %submitter, ?path, "gate notification");
            }
            GateEvent::PaymentConfirmed {
                entry_key,
                settlement_ref,
                amount_sats,
                ..
            } => {
                tracing::info!(event = event.event_type(), %entry_key, %settlement_ref, amount_sats, "gate notification");
            }
            GateEvent::PaymentExpired {
                entry_key,
                submitter,
                ..
            } => {
                tracing::info!(event = event.event_type(), %entry_key, %submitter, "gate notification");
            }
            GateEvent::TrustGranted {
                submitter,
                entry_key,
                ..
            } => {
                tracing::info!(event = event.event_type(), %entry_key, %submitter, "gate notification");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{EntryKey, SubmitterId, Timestamp};

    #[tokio::test]
    async fn notify_does_not_panic() {
        let observer = TracingObserver::new();
        observer
            .notify(GateEvent::PaymentExpired {
                entry_key: EntryKey::new("k1").unwrap(),
                submitter: SubmitterId::new("a".repeat(64)).unwrap(),
                at: Timestamp::now(),
            })
            .await;
    }
}
