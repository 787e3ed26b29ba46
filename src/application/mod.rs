//! Application layer: the admission controller, its store, the price
//! schedule, settlement polling, and the expiry reaper.

mod controller;
mod poller;
mod reaper;
mod schedule;
mod store;

pub use controller::{
    EntryAdmissionController, InvoiceRequestError, SubmitError, SubmitOutcome,
};
pub use reaper::{ExpiryReaper, ReaperConfig};
pub use schedule::PriceSchedule;
pub use store::PendingEntryStore;
