//! Abstract storage trait for verified email entries.
//!
//! Every storage backend (LMDB, in-memory for testing) implements this
//! trait. The rest of the codebase depends only on the trait.

pub mod entry;
pub mod error;
pub mod memory;
pub mod query;

pub use entry::VerifiedEmailEntry;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use query::{EntryPage, EntryQuery, OrderBy, OrderDir, TriState, DEFAULT_PER_PAGE, MAX_PER_PAGE};

use foyer_types::{EmailHash, Timestamp};

/// Trait for verified email entry storage.
///
/// One row per distinct email hash. Rows are created once, mutated by
/// single-field updates, and never deleted.
pub trait VerifiedEmailStore: Send + Sync {
    /// Insert a new entry for `email_hash` carrying `confirmation_code`,
    /// returning the assigned id. Fails with [`StoreError::Duplicate`] when
    /// the hash is already present; the existing row is left untouched.
    fn insert(&self, email_hash: &EmailHash, confirmation_code: &str) -> Result<u64, StoreError>;

    fn find_by_hash(&self, email_hash: &EmailHash) -> Result<Option<VerifiedEmailEntry>, StoreError>;

    fn find_by_id(&self, id: u64) -> Result<Option<VerifiedEmailEntry>, StoreError>;

    /// Filtered, ordered, paginated listing. The returned total counts the
    /// filtered set independent of pagination.
    fn query(&self, query: &EntryQuery) -> Result<EntryPage, StoreError>;

    /// Mark the entry confirmed at `confirmed_at`. Fails with
    /// [`StoreError::NotFound`] unless exactly one row is affected.
    fn update_confirmed(&self, id: u64, confirmed_at: Timestamp) -> Result<(), StoreError>;

    /// Set the spam flag. Returns whether the stored value actually changed;
    /// fails with [`StoreError::NotFound`] when the row is missing.
    fn update_spam(&self, id: u64, spam: bool) -> Result<bool, StoreError>;

    /// Record the moment a message was dispatched through this entry.
    fn update_last_sent(&self, id: u64, at: Timestamp) -> Result<(), StoreError>;

    fn count(&self) -> Result<u64, StoreError>;

    /// Entry deletion is not supported; moderation uses the spam flag
    /// instead. Every backend fails this call.
    fn delete(&self, id: u64) -> Result<(), StoreError> {
        Err(StoreError::Unsupported(format!(
            "deleting verified email entry {id}"
        )))
    }
}
