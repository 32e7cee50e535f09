//! In-memory storage backend.
//!
//! Mirrors the durable backend's semantics (id assignment, hash uniqueness,
//! exactly-one-row update rules) behind a mutex, for engine, mediator, and
//! API tests that don't want a database on disk.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use foyer_types::{EmailHash, Timestamp};

use crate::entry::VerifiedEmailEntry;
use crate::error::StoreError;
use crate::query::{EntryPage, EntryQuery};
use crate::VerifiedEmailStore;

#[derive(Default)]
struct Inner {
    next_id: u64,
    entries: BTreeMap<u64, VerifiedEmailEntry>,
    by_hash: HashMap<String, u64>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("memory store mutex poisoned")
    }
}

impl VerifiedEmailStore for MemoryStore {
    fn insert(&self, email_hash: &EmailHash, confirmation_code: &str) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        if inner.by_hash.contains_key(email_hash.as_str()) {
            return Err(StoreError::Duplicate(email_hash.to_string()));
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.entries.insert(
            id,
            VerifiedEmailEntry::new(id, email_hash.clone(), confirmation_code),
        );
        inner.by_hash.insert(email_hash.to_string(), id);
        Ok(id)
    }

    fn find_by_hash(
        &self,
        email_hash: &EmailHash,
    ) -> Result<Option<VerifiedEmailEntry>, StoreError> {
        let inner = self.lock();
        Ok(inner
            .by_hash
            .get(email_hash.as_str())
            .and_then(|id| inner.entries.get(id))
            .cloned())
    }

    fn find_by_id(&self, id: u64) -> Result<Option<VerifiedEmailEntry>, StoreError> {
        Ok(self.lock().entries.get(&id).cloned())
    }

    fn query(&self, query: &EntryQuery) -> Result<EntryPage, StoreError> {
        let candidates: Vec<VerifiedEmailEntry> = self.lock().entries.values().cloned().collect();
        Ok(query.evaluate(candidates))
    }

    fn update_confirmed(&self, id: u64, confirmed_at: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("entry {id}")))?;
        entry.is_confirmed = true;
        entry.date_confirmed = Some(confirmed_at);
        Ok(())
    }

    fn update_spam(&self, id: u64, spam: bool) -> Result<bool, StoreError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("entry {id}")))?;
        let changed = entry.is_spam != spam;
        entry.is_spam = spam;
        Ok(changed)
    }

    fn update_last_sent(&self, id: u64, at: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("entry {id}")))?;
        entry.date_last_email_sent = Some(at);
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.lock().entries.len() as u64)
    }
}
