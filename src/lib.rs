//! Listing Gate - Payment-Gated Admission for Directory Listings
//!
//! Gates admission of user-submitted listings into a shared public
//! event store behind a Lightning micropayment. Trusted submitters are
//! admitted immediately; everyone else pays an invoice bound to their
//! specific submission.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
