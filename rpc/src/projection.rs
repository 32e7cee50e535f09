//! Wire projection of a verified email entry.

use foyer_store::VerifiedEmailEntry;
use foyer_utils::format_iso8601;
use serde::{Deserialize, Serialize};

/// What API clients see of an entry. The confirmation code never appears
/// here; the `email` field carries the hash, keeping the field name the
/// original clients expect.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryView {
    pub id: u64,
    pub email: String,
    pub confirmed: bool,
    pub spam: bool,
    pub confirmation_date: String,
    pub last_use_date: String,
}

impl EntryView {
    pub fn from_entry(entry: &VerifiedEmailEntry) -> Self {
        Self {
            id: entry.id,
            email: entry.email_hash.as_str().to_string(),
            confirmed: entry.is_confirmed,
            spam: entry.is_spam,
            confirmation_date: entry
                .date_confirmed
                .map(format_iso8601)
                .unwrap_or_default(),
            last_use_date: entry
                .date_last_email_sent
                .map(format_iso8601)
                .unwrap_or_default(),
        }
    }

    /// The all-defaults projection returned when no entry exists, so the
    /// check endpoint answers 200 with a recognisable empty shape rather
    /// than 404.
    pub fn empty() -> Self {
        Self {
            id: 0,
            email: String::new(),
            confirmed: false,
            spam: false,
            confirmation_date: String::new(),
            last_use_date: String::new(),
        }
    }
}
