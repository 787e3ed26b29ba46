//! Foundation types shared across the domain: errors, identifiers,
//! and the Timestamp value object.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{EntryKey, SettlementRef, SubmitterId};
pub use timestamp::Timestamp;
