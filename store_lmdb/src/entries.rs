//! LMDB implementation of `VerifiedEmailStore`.
//!
//! `entries` is keyed by the big-endian entry id so iteration yields id
//! order. `hash_index` maps the email hash hex to the owning id; its
//! presence check and the insert happen inside one write transaction, which
//! is what makes duplicate submission a store-level atomic failure rather
//! than an application lock.

use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, RwTxn};

use foyer_store::{EntryPage, EntryQuery, StoreError, VerifiedEmailEntry, VerifiedEmailStore};
use foyer_types::{EmailHash, Timestamp};

use crate::LmdbError;

const NEXT_ID_KEY: &[u8] = b"next_id";

pub struct LmdbVerifiedEmailStore {
    pub(crate) env: Arc<Env>,
    pub(crate) entries_db: Database<Bytes, Bytes>,
    pub(crate) hash_index_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

fn decode_entry(bytes: &[u8]) -> Result<VerifiedEmailEntry, LmdbError> {
    bincode::deserialize(bytes).map_err(|e| LmdbError::Serialization(e.to_string()))
}

fn encode_entry(entry: &VerifiedEmailEntry) -> Result<Vec<u8>, LmdbError> {
    bincode::serialize(entry).map_err(|e| LmdbError::Serialization(e.to_string()))
}

fn decode_id(bytes: &[u8]) -> Result<u64, LmdbError> {
    let arr: [u8; 8] = bytes
        .try_into()
        .map_err(|_| LmdbError::Serialization("id has unexpected byte length".to_string()))?;
    Ok(u64::from_be_bytes(arr))
}

impl LmdbVerifiedEmailStore {
    /// Read and bump the id counter inside the caller's write transaction.
    fn allocate_id(&self, wtxn: &mut RwTxn<'_>) -> Result<u64, LmdbError> {
        let next = match self.meta_db.get(wtxn, NEXT_ID_KEY)? {
            Some(bytes) => decode_id(bytes)?,
            None => 1,
        };
        self.meta_db
            .put(wtxn, NEXT_ID_KEY, &(next + 1).to_be_bytes())?;
        Ok(next)
    }

    /// Load, mutate, and write back one entry in a single write transaction.
    fn mutate_entry<F>(&self, id: u64, mutate: F) -> Result<VerifiedEmailEntry, StoreError>
    where
        F: FnOnce(&mut VerifiedEmailEntry),
    {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let key = id.to_be_bytes();
        let bytes = self
            .entries_db
            .get(&wtxn, &key)
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(format!("entry {id}")))?;
        let mut entry = decode_entry(bytes)?;
        mutate(&mut entry);
        self.entries_db
            .put(&mut wtxn, &key, &encode_entry(&entry)?)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(entry)
    }
}

impl VerifiedEmailStore for LmdbVerifiedEmailStore {
    fn insert(&self, email_hash: &EmailHash, confirmation_code: &str) -> Result<u64, StoreError> {
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let hash_key = email_hash.as_str().as_bytes();
        if self
            .hash_index_db
            .get(&wtxn, hash_key)
            .map_err(LmdbError::from)?
            .is_some()
        {
            return Err(StoreError::Duplicate(email_hash.to_string()));
        }

        let id = self.allocate_id(&mut wtxn)?;
        let entry = VerifiedEmailEntry::new(id, email_hash.clone(), confirmation_code);

        self.entries_db
            .put(&mut wtxn, &id.to_be_bytes(), &encode_entry(&entry)?)
            .map_err(LmdbError::from)?;
        self.hash_index_db
            .put(&mut wtxn, hash_key, &id.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        Ok(id)
    }

    fn find_by_hash(
        &self,
        email_hash: &EmailHash,
    ) -> Result<Option<VerifiedEmailEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let id = match self
            .hash_index_db
            .get(&rtxn, email_hash.as_str().as_bytes())
            .map_err(LmdbError::from)?
        {
            Some(bytes) => decode_id(bytes)?,
            None => return Ok(None),
        };
        let entry = self
            .entries_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .map(decode_entry)
            .transpose()?;
        Ok(entry)
    }

    fn find_by_id(&self, id: u64) -> Result<Option<VerifiedEmailEntry>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let entry = self
            .entries_db
            .get(&rtxn, &id.to_be_bytes())
            .map_err(LmdbError::from)?
            .map(decode_entry)
            .transpose()?;
        Ok(entry)
    }

    fn query(&self, query: &EntryQuery) -> Result<EntryPage, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.entries_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut candidates = Vec::new();
        for result in iter {
            let (_key, value) = result.map_err(LmdbError::from)?;
            candidates.push(decode_entry(value)?);
        }
        Ok(query.evaluate(candidates))
    }

    fn update_confirmed(&self, id: u64, confirmed_at: Timestamp) -> Result<(), StoreError> {
        self.mutate_entry(id, |entry| {
            entry.is_confirmed = true;
            entry.date_confirmed = Some(confirmed_at);
        })?;
        Ok(())
    }

    fn update_spam(&self, id: u64, spam: bool) -> Result<bool, StoreError> {
        let mut changed = false;
        self.mutate_entry(id, |entry| {
            changed = entry.is_spam != spam;
            entry.is_spam = spam;
        })?;
        Ok(changed)
    }

    fn update_last_sent(&self, id: u64, at: Timestamp) -> Result<(), StoreError> {
        self.mutate_entry(id, |entry| {
            entry.date_last_email_sent = Some(at);
        })?;
        Ok(())
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.entries_db.len(&rtxn).map_err(LmdbError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LmdbEnvironment;
    use foyer_store::{OrderBy, OrderDir, TriState};
    use tempfile::TempDir;

    fn open_store() -> (TempDir, LmdbVerifiedEmailStore) {
        let dir = TempDir::new().unwrap();
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let store = env.verified_emails();
        (dir, store)
    }

    #[test]
    fn insert_and_find_round_trip() {
        let (_dir, store) = open_store();
        let hash = EmailHash::of_raw("foo@bar.com");
        let id = store.insert(&hash, "abcd1234abcd1234").unwrap();

        let entry = store.find_by_hash(&hash).unwrap().unwrap();
        assert_eq!(entry.id, id);
        assert_eq!(entry.confirmation_code, "abcd1234abcd1234");
        assert!(!entry.is_confirmed);
        assert!(!entry.is_spam);
        assert_eq!(entry.date_confirmed, None);

        assert_eq!(store.find_by_id(id).unwrap().unwrap(), entry);
    }

    #[test]
    fn duplicate_hash_is_rejected_atomically() {
        let (_dir, store) = open_store();
        let hash = EmailHash::of_raw("x@y.com");
        store.insert(&hash, "first").unwrap();
        let err = store.insert(&hash, "second").unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(store.count().unwrap(), 1);
        // The losing insert must not have consumed an id.
        let next = store.insert(&EmailHash::of_raw("z@y.com"), "third").unwrap();
        assert_eq!(next, 2);
    }

    #[test]
    fn ids_are_sequential_across_entries() {
        let (_dir, store) = open_store();
        for i in 1..=5u64 {
            let id = store
                .insert(&EmailHash::of_raw(&format!("user{i}@test.com")), "code")
                .unwrap();
            assert_eq!(id, i);
        }
    }

    #[test]
    fn confirm_spam_and_last_sent_updates() {
        let (_dir, store) = open_store();
        let hash = EmailHash::of_raw("u@v.com");
        let id = store.insert(&hash, "code").unwrap();

        store.update_confirmed(id, Timestamp::new(100)).unwrap();
        let entry = store.find_by_id(id).unwrap().unwrap();
        assert!(entry.is_confirmed);
        assert_eq!(entry.date_confirmed, Some(Timestamp::new(100)));

        assert!(store.update_spam(id, true).unwrap());
        assert!(!store.update_spam(id, true).unwrap());

        store.update_last_sent(id, Timestamp::new(200)).unwrap();
        let entry = store.find_by_id(id).unwrap().unwrap();
        assert_eq!(entry.date_last_email_sent, Some(Timestamp::new(200)));
        // Confirmation state untouched by the other updates.
        assert!(entry.is_confirmed && entry.is_spam);
    }

    #[test]
    fn updates_on_missing_ids_are_not_found() {
        let (_dir, store) = open_store();
        assert!(matches!(
            store.update_confirmed(7, Timestamp::now()),
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.update_spam(7, true),
            Err(StoreError::NotFound(_))
        ));
    }

    #[test]
    fn delete_is_unsupported() {
        let (_dir, store) = open_store();
        let id = store.insert(&EmailHash::of_raw("d@e.com"), "code").unwrap();
        assert!(matches!(store.delete(id), Err(StoreError::Unsupported(_))));
        assert!(store.find_by_id(id).unwrap().is_some());
    }

    #[test]
    fn query_filters_and_paginates() {
        let (_dir, store) = open_store();
        for i in 1..=6u64 {
            store
                .insert(&EmailHash::of_raw(&format!("user{i}@test.com")), "code")
                .unwrap();
        }
        store.update_confirmed(2, Timestamp::new(10)).unwrap();
        store.update_confirmed(4, Timestamp::new(20)).unwrap();
        store.update_spam(5, true).unwrap();

        let confirmed = store
            .query(&EntryQuery {
                confirmed: TriState::Only(true),
                spam: TriState::Only(false),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(confirmed.total, 2);

        let paged = store
            .query(&EntryQuery {
                order_by: OrderBy::Id,
                order_dir: OrderDir::Asc,
                per_page: 4,
                page: 2,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(paged.total, 6);
        let ids: Vec<u64> = paged.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 6]);

        let by_email = store
            .query(&EntryQuery {
                email_hash: Some(EmailHash::of_raw("user3@test.com")),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(by_email.total, 1);
        assert_eq!(by_email.entries[0].id, 3);
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let hash = EmailHash::of_raw("persist@test.com");
        {
            let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
            let store = env.verified_emails();
            let id = store.insert(&hash, "code").unwrap();
            store.update_confirmed(id, Timestamp::new(33)).unwrap();
        }
        let env = LmdbEnvironment::open(dir.path(), 16 * 1024 * 1024).unwrap();
        let store = env.verified_emails();
        let entry = store.find_by_hash(&hash).unwrap().unwrap();
        assert!(entry.is_confirmed);
        assert_eq!(entry.date_confirmed, Some(Timestamp::new(33)));
        // The id counter continues after reopen.
        let next = store.insert(&EmailHash::of_raw("later@test.com"), "code").unwrap();
        assert_eq!(next, 2);
    }
}
