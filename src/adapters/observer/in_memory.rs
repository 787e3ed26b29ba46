//! In-memory gate observer for test assertions.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::listing::GateEvent;
use crate::ports::GateObserver;

/// Observer capturing every notification for later assertions.
///
/// # Example
///
/// ```ignore
/// let observer = Arc::new(InMemoryGateObserver::new());
///
/// // ... drive the controller ...
///
/// assert!(observer.has_event("entry.admitted").await);
/// assert_eq!(observer.count_of("payment.expired").await, 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryGateObserver {
    events: RwLock<Vec<GateEvent>>,
}

impl InMemoryGateObserver {
    /// Creates an observer with no captured events.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured events in delivery order.
    pub async fn events(&self) -> Vec<GateEvent> {
        self.events.read().await.clone()
    }

    /// Returns the captured events of one type.
    pub async fn events_of_type(&self, event_type: &str) -> Vec<GateEvent> {
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event.event_type() == event_type)
            .cloned()
            .collect()
    }

    /// Whether an event of the given type was delivered.
    pub async fn has_event(&self, event_type: &str) -> bool {
        self.events
            .read()
            .await
            .iter()
            .any(|event| event.event_type() == event_type)
    }

    /// Number of delivered events of the given type.
    pub async fn count_of(&self, event_type: &str) -> usize {
        self.events
            .read()
            .await
            .iter()
            .filter(|event| event.event_type() == event_type)
            .count()
    }

    /// Clears all captured events (for test isolation).
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl GateObserver for InMemoryGateObserver {
    async fn notify(&self, event: GateEvent) {
        self.events.write().await.push(event);
    }
}
