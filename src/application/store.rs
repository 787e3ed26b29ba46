//! The authoritative in-memory table of submissions awaiting payment.

use std::collections::{HashMap, HashSet};

use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, EntryKey, ErrorCode, SettlementRef, Timestamp,
};
use crate::domain::payment::{EntryState, Invoice, PaymentIntent, PendingEntry};

/// Store owning all mutation of pending-entry state.
///
/// One lock guards the pending map, the settlement-reference index, and
/// the already-settled set together, so every compare-and-transition
/// below is a single critical section: of the racing confirm-via-poll,
/// confirm-via-receipt, and expiry paths, exactly one wins for a given
/// entry and the losers observe "already resolved".
///
/// No caller holds the lock across an external call; every method
/// clones data out.
#[derive(Debug, Default)]
pub struct PendingEntryStore {
    state: RwLock<StoreState>,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Entry key -> pending record. 1:1 partial mapping.
    pending: HashMap<EntryKey, PendingEntry>,

    /// Settlement reference -> entry key, maintained from invoice
    /// issuance until the entry leaves the store.
    by_settlement: HashMap<SettlementRef, EntryKey>,

    /// Keys whose payment already settled; admission for these is
    /// idempotent and never re-charges.
    settled: HashSet<EntryKey>,
}

impl PendingEntryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new entry in `Submitted`.
    ///
    /// If the key is already pending: the same submitter still in
    /// `Submitted` replaces the prior record atomically (refreshed
    /// request and deadline); anything else is a duplicate.
    pub async fn insert_submitted(&self, entry: PendingEntry) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        if let Some(existing) = state.pending.get(entry.entry_key()) {
            let replaceable = existing.state == EntryState::Submitted
                && existing.submitter() == entry.submitter();
            if !replaceable {
                return Err(DomainError::new(
                    ErrorCode::DuplicateEntry,
                    format!("entry '{}' is already pending", entry.entry_key()),
                ));
            }
        }

        state.pending.insert(entry.entry_key().clone(), entry);
        Ok(())
    }

    /// Returns a copy of the entry for `key`, if pending.
    pub async fn get(&self, key: &EntryKey) -> Option<PendingEntry> {
        self.state.read().await.pending.get(key).cloned()
    }

    /// Returns a copy of the entry owning `reference`, if pending.
    pub async fn find_by_settlement(&self, reference: &SettlementRef) -> Option<PendingEntry> {
        let state = self.state.read().await;
        let key = state.by_settlement.get(reference)?;
        state.pending.get(key).cloned()
    }

    /// Attaches an invoice: compare-and-transition `Submitted ->
    /// InvoiceIssued` and index the settlement reference.
    ///
    /// Fails if the entry is gone or no longer in `Submitted` (a
    /// concurrent invoice request or reclaim won).
    pub async fn attach_invoice(
        &self,
        key: &EntryKey,
        invoice: Invoice,
        intent: PaymentIntent,
        now: Timestamp,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;

        let entry = state.pending.get_mut(key).ok_or_else(|| {
            DomainError::new(
                ErrorCode::NoSuchPendingEntry,
                format!("no pending entry '{}'", key),
            )
        })?;

        if entry.state != EntryState::Submitted {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("entry '{}' is not awaiting an invoice", key),
            ));
        }

        let reference = invoice.settlement_ref.clone();
        entry.issue_invoice(invoice, intent, now)?;
        state.by_settlement.insert(reference, key.clone());
        Ok(())
    }

    /// Compare-and-transition to `Confirmed`: removes the entry, records
    /// the key as settled, and returns the record — all in one critical
    /// section. Returns `None` unless the entry is in `InvoiceIssued`;
    /// a late poll result or duplicate receipt simply gets `None`.
    pub async fn take_confirmed(&self, key: &EntryKey, now: Timestamp) -> Option<PendingEntry> {
        let mut state = self.state.write().await;
        self.take_confirmed_locked(&mut state, key, now)
    }

    /// As [`take_confirmed`](Self::take_confirmed), looked up by
    /// settlement reference (the poll path).
    pub async fn take_confirmed_by_settlement(
        &self,
        reference: &SettlementRef,
        now: Timestamp,
    ) -> Option<PendingEntry> {
        let mut state = self.state.write().await;
        let key = state.by_settlement.get(reference)?.clone();
        self.take_confirmed_locked(&mut state, &key, now)
    }

    fn take_confirmed_locked(
        &self,
        state: &mut StoreState,
        key: &EntryKey,
        now: Timestamp,
    ) -> Option<PendingEntry> {
        match state.pending.get(key) {
            Some(entry) if entry.state == EntryState::InvoiceIssued => {}
            _ => return None,
        }

        let mut entry = state.pending.remove(key)?;
        // Cannot fail: checked InvoiceIssued above, under the same lock.
        let _ = entry.transition(EntryState::Confirmed, now);
        if let Some(invoice) = &entry.invoice {
            state.by_settlement.remove(&invoice.settlement_ref);
        }
        state.settled.insert(key.clone());
        Some(entry)
    }

    /// Whether a payment already settled for `key`.
    pub async fn is_settled(&self, key: &EntryKey) -> bool {
        self.state.read().await.settled.contains(key)
    }

    /// Removes and returns every entry whose deadline has passed.
    ///
    /// Each removed record is returned in `Expired`; expired keys are
    /// not recorded as settled.
    pub async fn reclaim_expired(
        &self,
        now: Timestamp,
        timeout_secs: u64,
    ) -> Vec<PendingEntry> {
        let mut state = self.state.write().await;

        let expired_keys: Vec<EntryKey> = state
            .pending
            .values()
            .filter(|entry| entry.is_expired(now, timeout_secs))
            .map(|entry| entry.entry_key().clone())
            .collect();

        let mut reclaimed = Vec::with_capacity(expired_keys.len());
        for key in expired_keys {
            if let Some(mut entry) = state.pending.remove(&key) {
                if let Some(invoice) = &entry.invoice {
                    state.by_settlement.remove(&invoice.settlement_ref);
                }
                let _ = entry.transition(EntryState::Expired, now);
                reclaimed.push(entry);
            }
        }
        reclaimed
    }

    /// Number of entries currently pending.
    pub async fn pending_count(&self) -> usize {
        self.state.read().await.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SubmitterId;
    use crate::domain::listing::{Category, SubmissionRequest};

    fn submitter(c: char) -> SubmitterId {
        SubmitterId::new(std::iter::repeat(c).take(64).collect::<String>()).unwrap()
    }

    fn request(key: &str, who: char) -> SubmissionRequest {
        SubmissionRequest {
            submitter: submitter(who),
            entry_key: EntryKey::new(key).unwrap(),
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

    fn entry(key: &str, who: char, at: u64) -> PendingEntry {
        PendingEntry::new(request(key, who), Timestamp::from_unix_secs(at))
    }

    fn invoice(reference: &str) -> Invoice {
        Invoice {
            settlement_ref: SettlementRef::new(reference).unwrap(),
            payment_request: "lnbc...".to_string(),
            amount_sats: 1000,
            expires_at: Timestamp::from_unix_secs(400),
        }
    }

    fn intent(key: &str, who: char) -> PaymentIntent {
        PaymentIntent {
            submitter: submitter(who),
            amount_sats: 1000,
            entry_key: EntryKey::new(key).unwrap(),
            created_at: Timestamp::from_unix_secs(100),
        }
    }

    async fn store_with_issued(key: &str, reference: &str) -> PendingEntryStore {
        let store = PendingEntryStore::new();
        store.insert_submitted(entry(key, 'a', 100)).await.unwrap();
        store
            .attach_invoice(
                &EntryKey::new(key).unwrap(),
                invoice(reference),
                intent(key, 'a'),
                Timestamp::from_unix_secs(110),
            )
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn insert_then_get_roundtrips() {
        let store = PendingEntryStore::new();
        store.insert_submitted(entry("k1", 'a', 100)).await.unwrap();

        let got = store.get(&EntryKey::new("k1").unwrap()).await.unwrap();
        assert_eq!(got.state, EntryState::Submitted);
    }

    #[tokio::test]
    async fn same_submitter_resubmission_replaces_while_submitted() {
        let store = PendingEntryStore::new();
        store.insert_submitted(entry("k1", 'a', 100)).await.unwrap();
        store.insert_submitted(entry("k1", 'a', 200)).await.unwrap();

        let got = store.get(&EntryKey::new("k1").unwrap()).await.unwrap();
        assert_eq!(got.arrived_at, Timestamp::from_unix_secs(200));
        assert_eq!(store.pending_count().await, 1);
    }

    #[tokio::test]
    async fn different_submitter_is_rejected_as_duplicate() {
        let store = PendingEntryStore::new();
        store.insert_submitted(entry("k1", 'a', 100)).await.unwrap();

        let err = store
            .insert_submitted(entry("k1", 'b', 200))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEntry);
    }

    #[tokio::test]
    async fn resubmission_after_invoice_issue_is_rejected() {
        let store = store_with_issued("k1", "r1").await;

        let err = store
            .insert_submitted(entry("k1", 'a', 200))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DuplicateEntry);
    }

    #[tokio::test]
    async fn attach_invoice_indexes_settlement_reference() {
        let store = store_with_issued("k1", "r1").await;

        let found = store
            .find_by_settlement(&SettlementRef::new("r1").unwrap())
            .await
            .unwrap();
        assert_eq!(found.entry_key().as_str(), "k1");
        assert_eq!(found.state, EntryState::InvoiceIssued);
    }

    #[tokio::test]
    async fn attach_invoice_fails_for_missing_entry() {
        let store = PendingEntryStore::new();
        let err = store
            .attach_invoice(
                &EntryKey::new("ghost").unwrap(),
                invoice("r1"),
                intent("ghost", 'a'),
                Timestamp::from_unix_secs(110),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NoSuchPendingEntry);
    }

    #[tokio::test]
    async fn attach_invoice_fails_when_already_issued() {
        let store = store_with_issued("k1", "r1").await;
        let err = store
            .attach_invoice(
                &EntryKey::new("k1").unwrap(),
                invoice("r2"),
                intent("k1", 'a'),
                Timestamp::from_unix_secs(120),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
    }

    #[tokio::test]
    async fn take_confirmed_wins_once_and_marks_settled() {
        let store = store_with_issued("k1", "r1").await;
        let key = EntryKey::new("k1").unwrap();
        let now = Timestamp::from_unix_secs(120);

        let winner = store.take_confirmed(&key, now).await;
        assert!(winner.is_some());
        assert_eq!(winner.unwrap().state, EntryState::Confirmed);

        // Second attempt loses: entry is gone.
        assert!(store.take_confirmed(&key, now).await.is_none());
        assert!(store.is_settled(&key).await);
        assert_eq!(store.pending_count().await, 0);
    }

    #[tokio::test]
    async fn take_confirmed_is_noop_before_invoice() {
        let store = PendingEntryStore::new();
        store.insert_submitted(entry("k1", 'a', 100)).await.unwrap();

        let key = EntryKey::new("k1").unwrap();
        assert!(store
            .take_confirmed(&key, Timestamp::from_unix_secs(120))
            .await
            .is_none());
        assert!(!store.is_settled(&key).await);
    }

    #[tokio::test]
    async fn take_confirmed_by_settlement_resolves_reference() {
        let store = store_with_issued("k1", "r1").await;
        let reference = SettlementRef::new("r1").unwrap();

        let taken = store
            .take_confirmed_by_settlement(&reference, Timestamp::from_unix_secs(120))
            .await;
        assert!(taken.is_some());

        // Index is cleaned up with the entry.
        assert!(store.find_by_settlement(&reference).await.is_none());
    }

    #[tokio::test]
    async fn reclaim_expired_removes_only_overdue_entries() {
        let store = PendingEntryStore::new();
        store.insert_submitted(entry("old", 'a', 100)).await.unwrap();
        store.insert_submitted(entry("new", 'b', 390)).await.unwrap();

        let reclaimed = store
            .reclaim_expired(Timestamp::from_unix_secs(401), 300)
            .await;

        assert_eq!(reclaimed.len(), 1);
        assert_eq!(reclaimed[0].entry_key().as_str(), "old");
        assert_eq!(reclaimed[0].state, EntryState::Expired);
        assert_eq!(store.pending_count().await, 1);
    }

    #[tokio::test]
    async fn reclaim_expired_drops_settlement_index() {
        let store = store_with_issued("k1", "r1").await;

        let reclaimed = store
            .reclaim_expired(Timestamp::from_unix_secs(1000), 300)
            .await;
        assert_eq!(reclaimed.len(), 1);

        assert!(store
            .find_by_settlement(&SettlementRef::new("r1").unwrap())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn expired_keys_are_not_settled() {
        let store = store_with_issued("k1", "r1").await;
        store
            .reclaim_expired(Timestamp::from_unix_secs(1000), 300)
            .await;

        assert!(!store.is_settled(&EntryKey::new("k1").unwrap()).await);
    }

    #[tokio::test]
    async fn concurrent_confirmations_have_exactly_one_winner() {
        let store = std::sync::Arc::new(store_with_issued("k1", "r1").await);
        let key = EntryKey::new("k1").unwrap();
        let now = Timestamp::from_unix_secs(120);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let key = key.clone();
            tasks.push(tokio::spawn(async move {
                store.take_confirmed(&key, now).await.is_some()
            }));
        }

        let mut winners = 0;
        for task in tasks {
            if task.await.unwrap() {
                winners += 1;
            }
        }
        assert_eq!(winners, 1);
    }
}
