//! Public types returned by RDAP lookups.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome marker of the most recent refresh attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    /// Structured registration data was obtained.
    Success,
    /// No structured data; the user has to check the domain by hand.
    ManualCheck,
}

impl UpdateStatus {
    /// Wire name (`"success"` / `"manual_check"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ManualCheck => "manual_check",
        }
    }
}

impl fmt::Display for UpdateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration fields parsed from a successful RDAP reply.
///
/// Every field is best-effort: `None` means the reply did not carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapRecord {
    /// Date of the `registration` event.
    pub registration_date: Option<NaiveDate>,
    /// Date of the `expiration` event.
    pub expiration_date: Option<NaiveDate>,
    /// Formatted name (`fn`) of the registrar entity.
    pub registrar: Option<String>,
    /// Full reply, pretty-printed.
    pub raw: String,
}

/// Classified result of a single domain lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LookupOutcome {
    /// The resolver answered with a parseable RDAP document.
    Success(RdapRecord),
    /// The resolver answered 400/404/500: unregistered domain or TLD it does not serve.
    NotFound { status: u16 },
    /// Connection, timeout or malformed JSON.
    TransportError { message: String },
    /// No request was made (unsupported TLD, invalid name).
    Skipped { reason: String },
}

impl LookupOutcome {
    /// Refresh marker for this outcome.
    #[must_use]
    pub const fn update_status(&self) -> UpdateStatus {
        match self {
            Self::Success(_) => UpdateStatus::Success,
            Self::NotFound { .. } | Self::TransportError { .. } | Self::Skipped { .. } => {
                UpdateStatus::ManualCheck
            }
        }
    }

    /// Text stored in the record's raw WHOIS field: the payload on success, a diagnostic otherwise.
    #[must_use]
    pub fn raw_text(&self) -> String {
        match self {
            Self::Success(record) => record.raw.clone(),
            Self::NotFound { status } => {
                format!("Whois lookup failed or not supported for this TLD (Status: {status})")
            }
            Self::TransportError { message } => format!("Error during fetch: {message}"),
            Self::Skipped { reason } => reason.clone(),
        }
    }

    /// Parsed fields, present only for [`Success`](Self::Success).
    #[must_use]
    pub const fn record(&self) -> Option<&RdapRecord> {
        match self {
            Self::Success(record) => Some(record),
            _ => None,
        }
    }
}

/// One RDAP event (`eventAction` + `eventDate`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapEvent {
    pub action: String,
    pub date: String,
}

/// An entity reduced to roles, handle and display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapEntitySummary {
    pub roles: Vec<String>,
    pub handle: Option<String>,
    /// vCard `fn`, or `"Unknown"`.
    pub name: String,
}

/// Human-oriented view of a stored RDAP document.
///
/// Built from the raw WHOIS text with [`RdapSummary::from_raw`]; diagnostics and hand-written
/// notes do not parse and yield `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdapSummary {
    /// `ldhName`, falling back to `handle`.
    pub domain_name: Option<String>,
    /// Registry domain ID.
    pub handle: Option<String>,
    /// EPP status values.
    pub status: Vec<String>,
    pub events: Vec<RdapEvent>,
    pub nameservers: Vec<String>,
    pub entities: Vec<RdapEntitySummary>,
}
