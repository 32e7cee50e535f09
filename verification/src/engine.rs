//! The verification engine: submit, validate, moderate.

use std::sync::Arc;

use foyer_store::{StoreError, VerifiedEmailEntry, VerifiedEmailStore};
use foyer_types::{EmailAddress, EmailHash, Timestamp};
use tracing::{debug, info};

use crate::code::mint_code;
use crate::error::VerificationError;
use crate::status::VerificationStatus;

/// The outcome of a successful submission.
///
/// Carries the plaintext address alongside the persisted entry: this is the
/// only place the plaintext is available after submission (the store keeps
/// the hash), and the caller needs it to dispatch the verification message.
#[derive(Clone, Debug)]
pub struct SubmittedEntry {
    pub email: EmailAddress,
    pub entry: VerifiedEmailEntry,
}

/// Business rules layered over the store.
pub struct VerificationEngine {
    store: Arc<dyn VerifiedEmailStore>,
}

impl VerificationEngine {
    pub fn new(store: Arc<dyn VerifiedEmailStore>) -> Self {
        Self { store }
    }

    /// The underlying store, for read paths and usage bookkeeping.
    pub fn store(&self) -> &Arc<dyn VerifiedEmailStore> {
        &self.store
    }

    /// Derive the status of an email hash.
    pub fn status_of_hash(&self, hash: &EmailHash) -> Result<VerificationStatus, VerificationError> {
        let entry = self.store.find_by_hash(hash)?;
        Ok(VerificationStatus::of(entry.as_ref()))
    }

    /// Submit an address for verification, minting a fresh confirmation code.
    ///
    /// Re-submission is rejected, never silently accepted: the second caller
    /// must validate against the code already on file. Two concurrent
    /// submissions race at the store's uniqueness constraint and the loser
    /// surfaces the same rejection.
    pub fn submit(&self, raw_email: &str) -> Result<SubmittedEntry, VerificationError> {
        let email = EmailAddress::parse(raw_email)
            .map_err(|e| VerificationError::InvalidEmailFormat(e.to_string()))?;
        let hash = email.hash();

        if self.status_of_hash(&hash)? != VerificationStatus::NotCreated {
            return Err(VerificationError::AlreadySubmitted);
        }

        let code = mint_code();
        let id = match self.store.insert(&hash, &code) {
            Ok(id) => id,
            Err(StoreError::Duplicate(_)) => return Err(VerificationError::AlreadySubmitted),
            Err(e) => return Err(e.into()),
        };

        let entry = self
            .store
            .find_by_id(id)?
            .ok_or_else(|| StoreError::NotFound(format!("entry {id}")))?;

        info!(entry_id = id, "email submitted for verification");
        Ok(SubmittedEntry { email, entry })
    }

    /// Validate a confirmation code against a pending entry.
    ///
    /// Only a `WaitingConfirmation` entry can be confirmed; every other
    /// status fails with its own non-retryable error. A code mismatch is
    /// retryable. Confirmation is irreversible through this path.
    pub fn validate(
        &self,
        raw_email: &str,
        code: &str,
    ) -> Result<VerifiedEmailEntry, VerificationError> {
        if code.trim().is_empty() {
            return Err(VerificationError::InvalidInput(
                "empty confirmation code".to_string(),
            ));
        }
        let email = EmailAddress::parse(raw_email)
            .map_err(|e| VerificationError::InvalidInput(e.to_string()))?;
        let hash = email.hash();

        let entry = self.store.find_by_hash(&hash)?;
        let entry = match (VerificationStatus::of(entry.as_ref()), entry) {
            (VerificationStatus::WaitingConfirmation, Some(entry)) => entry,
            (VerificationStatus::NotCreated, _) | (_, None) => {
                return Err(VerificationError::NotSubmitted)
            }
            (VerificationStatus::Confirmed, _) => return Err(VerificationError::AlreadyConfirmed),
            (VerificationStatus::Spammed, _) => return Err(VerificationError::MarkedSpam),
        };

        if entry.confirmation_code != code {
            debug!(entry_id = entry.id, "confirmation code mismatch");
            return Err(VerificationError::WrongCode);
        }

        self.store.update_confirmed(entry.id, Timestamp::now())?;
        let entry = self
            .store
            .find_by_id(entry.id)?
            .ok_or_else(|| StoreError::NotFound(format!("entry {}", entry.id)))?;

        info!(entry_id = entry.id, "email confirmed");
        Ok(entry)
    }

    /// Flip the spam flag. Idempotent: returns whether the stored value
    /// actually changed.
    pub fn set_spam(&self, id: u64, spam: bool) -> Result<bool, VerificationError> {
        let changed = self.store.update_spam(id, spam)?;
        if changed {
            info!(entry_id = id, spam, "spam flag updated");
        }
        Ok(changed)
    }
}
