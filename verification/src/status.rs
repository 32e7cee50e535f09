//! Derived verification status.

use foyer_store::VerifiedEmailEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The status of an email address, computed on read from entry fields and
/// never stored. Precedence, highest first: spam, confirmed, waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// No row exists for this address.
    NotCreated,
    /// A row with a confirmation code exists, not yet validated.
    WaitingConfirmation,
    /// The code was validated; terminal success.
    Confirmed,
    /// Moderation veto; overrides either prior state until unspammed.
    Spammed,
}

impl VerificationStatus {
    /// Derive the status of an optional entry.
    pub fn of(entry: Option<&VerifiedEmailEntry>) -> Self {
        let Some(entry) = entry else {
            return VerificationStatus::NotCreated;
        };
        if entry.is_spam {
            VerificationStatus::Spammed
        } else if entry.is_confirmed {
            VerificationStatus::Confirmed
        } else if !entry.confirmation_code.is_empty() {
            VerificationStatus::WaitingConfirmation
        } else {
            VerificationStatus::NotCreated
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VerificationStatus::NotCreated => "not_created",
            VerificationStatus::WaitingConfirmation => "waiting_confirmation",
            VerificationStatus::Confirmed => "confirmed",
            VerificationStatus::Spammed => "spammed",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foyer_types::EmailHash;

    fn entry(confirmed: bool, spam: bool, code: &str) -> VerifiedEmailEntry {
        let mut e = VerifiedEmailEntry::new(1, EmailHash::of_raw("a@b.com"), code);
        e.is_confirmed = confirmed;
        e.is_spam = spam;
        e
    }

    #[test]
    fn missing_row_is_not_created() {
        assert_eq!(VerificationStatus::of(None), VerificationStatus::NotCreated);
    }

    #[test]
    fn code_present_waits_for_confirmation() {
        assert_eq!(
            VerificationStatus::of(Some(&entry(false, false, "code"))),
            VerificationStatus::WaitingConfirmation
        );
    }

    #[test]
    fn confirmed_wins_over_waiting() {
        assert_eq!(
            VerificationStatus::of(Some(&entry(true, false, "code"))),
            VerificationStatus::Confirmed
        );
    }

    #[test]
    fn spam_wins_over_everything() {
        assert_eq!(
            VerificationStatus::of(Some(&entry(true, true, "code"))),
            VerificationStatus::Spammed
        );
        assert_eq!(
            VerificationStatus::of(Some(&entry(false, true, "code"))),
            VerificationStatus::Spammed
        );
    }
}
