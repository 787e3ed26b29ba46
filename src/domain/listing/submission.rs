//! Listing submissions and admitted records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryKey, SubmitterId, Timestamp, ValidationError};

use super::Category;

/// Minimum lengths for the free-text fields.
const MIN_TITLE_LEN: usize = 3;
const MIN_SUMMARY_LEN: usize = 10;
const MIN_DESCRIPTION_LEN: usize = 20;

/// Publication status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Submitted but not yet admitted.
    Pending,
    /// Admitted to the public store.
    Active,
}

/// A listing a submitter wants admitted.
///
/// Immutable once accepted as a pending entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    /// Submitter identity.
    pub submitter: SubmitterId,

    /// Stable, user-chosen entry identifier.
    pub entry_key: EntryKey,

    /// Listing title.
    pub title: String,

    /// One-line summary.
    pub summary: String,

    /// Full description.
    pub description: String,

    /// Declared category.
    pub category: Category,

    /// Free-form location (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Website URL (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Contact handle: email, npub, or other identifier (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    /// When the submitter created the listing.
    pub created_at: Timestamp,
}

impl SubmissionRequest {
    /// Validates structural well-formedness of the submission.
    ///
    /// Checks field lengths and the website scheme; the entry key and
    /// submitter are validated at construction of their value objects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_min_len("title", &self.title, MIN_TITLE_LEN)?;
        check_min_len("summary", &self.summary, MIN_SUMMARY_LEN)?;
        check_min_len("description", &self.description, MIN_DESCRIPTION_LEN)?;

        if let Some(website) = &self.website {
            if !website.starts_with("http://") && !website.starts_with("https://") {
                return Err(ValidationError::invalid_format(
                    "website",
                    "must be an http(s) URL",
                ));
            }
        }

        Ok(())
    }
}

fn check_min_len(field: &str, value: &str, min: usize) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(ValidationError::empty_field(field));
    }
    if len < min {
        return Err(ValidationError::too_short(field, min, len));
    }
    Ok(())
}

/// The final artifact forwarded to the external event store.
///
/// Derived from a [`SubmissionRequest`] with the status flipped to
/// [`ListingStatus::Active`]. Produced exactly once per entry key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmittedRecord {
    pub submitter: SubmitterId,
    pub entry_key: EntryKey,
    pub title: String,
    pub summary: String,
    pub description: String,
    pub category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    pub status: ListingStatus,
    pub created_at: Timestamp,
    pub admitted_at: Timestamp,
}

impl AdmittedRecord {
    /// Builds the admitted record for a submission.
    pub fn from_request(request: &SubmissionRequest, admitted_at: Timestamp) -> Self {
        Self {
            submitter: request.submitter.clone(),
            entry_key: request.entry_key.clone(),
            title: request.title.clone(),
            summary: request.summary.clone(),
            description: request.description.clone(),
            category: request.category,
            location: request.location.clone(),
            website: request.website.clone(),
            contact: request.contact.clone(),
            status: ListingStatus::Active,
            created_at: request.created_at,
            admitted_at,
        }
    }
}
