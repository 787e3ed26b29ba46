//! Invoice gateway adapters.

mod lnbits;
mod mock;

pub use lnbits::{LnbitsConfig, LnbitsGateway};
pub use mock::MockInvoiceGateway;
