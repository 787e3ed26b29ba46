//! Ports: the contracts between the gate and its external collaborators.
//!
//! Each port gets its own file; adapters live in `crate::adapters`.

mod admission_sink;
mod gate_observer;
mod invoice_gateway;
mod trust_oracle;

pub use admission_sink::{AdmissionSink, SinkError};
pub use gate_observer::GateObserver;
pub use invoice_gateway::{
    CreateInvoiceRequest, GatewayError, InvoiceGateway, SettlementStatus,
};
pub use trust_oracle::TrustOracle;
