//! Gate observer port: notifications for logging and analytics.

use async_trait::async_trait;

use crate::domain::listing::GateEvent;

/// Port receiving gate notifications.
///
/// Delivery is fire-and-forget by design: observers must not influence
/// admission decisions, so `notify` cannot fail from the gate's point
/// of view. Observers that hit trouble log it themselves.
#[async_trait]
pub trait GateObserver: Send + Sync {
    /// Delivers one notification.
    async fn notify(&self, event: GateEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_observer_is_object_safe() {
        fn _accepts_dyn(_observer: &dyn GateObserver) {}
    }
}
