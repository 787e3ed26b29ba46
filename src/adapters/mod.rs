//! Adapters: concrete implementations of the ports.

pub mod lightning;
pub mod observer;
pub mod sink;
pub mod trust;

pub use lightning::{LnbitsConfig, LnbitsGateway, MockInvoiceGateway};
pub use observer::{InMemoryGateObserver, TracingObserver};
pub use sink::{InMemoryAdmissionSink, RelayForwardConfig, RelayForwardSink};
pub use trust::{RelayHttpTrustOracle, RelayTrustConfig, StaticTrustOracle};
