//! Admission sink adapters: direct in-memory storage or forwarding to
//! a companion relay.

mod in_memory;
mod relay_forward;

pub use in_memory::InMemoryAdmissionSink;
pub use relay_forward::{RelayForwardConfig, RelayForwardSink};
