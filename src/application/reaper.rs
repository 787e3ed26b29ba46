//! Background sweep reclaiming timed-out pending entries.

use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::Timestamp;

use super::controller::EntryAdmissionController;

/// Configuration for the expiry reaper.
#[derive(Debug, Clone)]
pub struct ReaperConfig {
    /// How often the full store is swept.
    ///
    /// A fixed interval rather than per-entry timers bounds memory and
    /// avoids timer storms under load; an expired entry may survive up
    /// to one extra interval, which affects cleanup latency only, not
    /// admission correctness.
    pub sweep_interval: Duration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_secs(60),
        }
    }
}

impl ReaperConfig {
    /// Sets the sweep interval.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

/// Background service sweeping the pending-entry store.
pub struct ExpiryReaper {
    controller: EntryAdmissionController,
    config: ReaperConfig,
}

impl ExpiryReaper {
    /// Creates a reaper with the default sweep interval.
    pub fn new(controller: EntryAdmissionController) -> Self {
        Self {
            controller,
            config: ReaperConfig::default(),
        }
    }

    /// Creates a reaper with custom configuration.
    pub fn with_config(controller: EntryAdmissionController, config: ReaperConfig) -> Self {
        Self { controller, config }
    }

    /// Runs the sweep loop until the shutdown signal flips to true.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.sweep_interval);
        // Skip the immediate first tick; nothing can have expired yet.
        interval.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::debug!("expiry reaper stopping");
                        return;
                    }
                }
                _ = interval.tick() => {
                    let reclaimed = self.controller.reclaim_expired(Timestamp::now()).await;
                    if reclaimed > 0 {
                        tracing::info!(reclaimed, "reclaimed expired pending entries");
                    }
                }
            }
        }
    }
}
