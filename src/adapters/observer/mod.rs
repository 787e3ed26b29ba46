//! Gate observer adapters.

mod in_memory;
mod tracing_log;

pub use in_memory::InMemoryGateObserver;
pub use tracing_log::TracingObserver;
