//! The persisted verified email record.

use foyer_types::{EmailHash, Timestamp};
use serde::{Deserialize, Serialize};

/// One row per distinct email address ever submitted for verification.
///
/// The plaintext address is never stored; `email_hash` is the natural key.
/// The confirmation code is kept for audit after confirmation but is never
/// included in any response projection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedEmailEntry {
    /// Store-assigned id, immutable.
    pub id: u64,
    /// One-way hash of the normalized address, unique.
    pub email_hash: EmailHash,
    /// Bearer token compared verbatim on validation.
    pub confirmation_code: String,
    /// Set true exactly once; no path reverts it.
    pub is_confirmed: bool,
    /// Moderation veto, settable and unsettable at any time.
    pub is_spam: bool,
    /// `Some` iff `is_confirmed`.
    pub date_confirmed: Option<Timestamp>,
    /// Last successful dispatch through this entry, for auditing. The core
    /// records the fact; it enforces no throttling.
    pub date_last_email_sent: Option<Timestamp>,
}

impl VerifiedEmailEntry {
    /// A fresh, unconfirmed entry. Backends assign the id.
    pub fn new(id: u64, email_hash: EmailHash, confirmation_code: impl Into<String>) -> Self {
        Self {
            id,
            email_hash,
            confirmation_code: confirmation_code.into(),
            is_confirmed: false,
            is_spam: false,
            date_confirmed: None,
            date_last_email_sent: None,
        }
    }
}
