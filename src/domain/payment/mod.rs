//! Payment types: intents, invoices, receipts, pending entries, and
//! the receipt validator.

mod intent;
mod invoice;
mod pending;
mod receipt;
mod validator;

pub use intent::PaymentIntent;
pub use invoice::Invoice;
pub use pending::{EntryState, PendingEntry};
pub use receipt::PaymentReceipt;
pub use validator::{ReceiptError, ReceiptValidator};
