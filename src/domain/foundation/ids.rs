//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{Timestamp, ValidationError};

/// Maximum length of a user-chosen entry key.
const MAX_ENTRY_KEY_LEN: usize = 128;

/// Identity of a submitter: a 64-character lowercase hex public key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmitterId(String);

impl SubmitterId {
    /// Creates a SubmitterId, validating the hex pubkey format.
    pub fn new(pubkey: impl Into<String>) -> Result<Self, ValidationError> {
        let pubkey = pubkey.into();
        if pubkey.is_empty() {
            return Err(ValidationError::empty_field("pubkey"));
        }
        if pubkey.len() != 64 || !pubkey.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ValidationError::invalid_format(
                "pubkey",
                "expected 64 hex characters",
            ));
        }
        if pubkey.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::invalid_format(
                "pubkey",
                "expected lowercase hex",
            ));
        }
        Ok(Self(pubkey))
    }

    /// Returns the hex pubkey string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the first 8 characters, used in derived entry keys.
    pub fn short(&self) -> &str {
        &self.0[..8]
    }
}

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubmitterId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Stable identifier a submitter assigns to their listing.
///
/// Correlates submission, invoice, and receipt. Always the user-chosen
/// field, never a transport-level message id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryKey(String);

impl EntryKey {
    /// Creates an EntryKey from a user-chosen identifier.
    pub fn new(key: impl Into<String>) -> Result<Self, ValidationError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ValidationError::empty_field("entry_key"));
        }
        if key.len() > MAX_ENTRY_KEY_LEN {
            return Err(ValidationError::invalid_format(
                "entry_key",
                format!("longer than {} characters", MAX_ENTRY_KEY_LEN),
            ));
        }
        if key.chars().any(char::is_whitespace) {
            return Err(ValidationError::invalid_format(
                "entry_key",
                "must not contain whitespace",
            ));
        }
        Ok(Self(key))
    }

    /// Derives the canonical entry key for a submitter and creation time.
    ///
    /// Clients that do not choose their own key use this form:
    /// `listing-<pubkey prefix>-<unix seconds>`.
    pub fn derive(submitter: &SubmitterId, created_at: Timestamp) -> Self {
        Self(format!(
            "listing-{}-{}",
            submitter.short(),
            created_at.as_unix_secs()
        ))
    }

    /// Returns the key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntryKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Opaque id returned by the payment backend identifying one invoice's
/// payment lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettlementRef(String);

impl SettlementRef {
    /// Creates a SettlementRef from the backend's payment hash.
    pub fn new(reference: impl Into<String>) -> Result<Self, ValidationError> {
        let reference = reference.into();
        if reference.is_empty() {
            return Err(ValidationError::empty_field("settlement_ref"));
        }
        Ok(Self(reference))
    }

    /// Returns the reference string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettlementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
