//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::entries::LmdbVerifiedEmailStore;
use crate::LmdbError;

const MAX_DBS: u32 = 4;

/// Default map size: 256 MiB is generous for a table of hashed addresses.
pub const DEFAULT_MAP_SIZE: usize = 256 * 1024 * 1024;

/// Wraps the LMDB environment and all database handles.
pub struct LmdbEnvironment {
    env: Arc<Env>,
    pub(crate) entries_db: Database<Bytes, Bytes>,
    pub(crate) hash_index_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Heed(format!("creating {}: {e}", path.display())))?;

        // Safety contract of heed: the environment path must not be opened
        // twice in the same process. The daemon opens it once at startup.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let entries_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("entries"))?;
        let hash_index_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("hash_index"))?;
        let meta_db = env.create_database::<Bytes, Bytes>(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::debug!(path = %path.display(), "opened LMDB environment");

        Ok(Self {
            env: Arc::new(env),
            entries_db,
            hash_index_db,
            meta_db,
        })
    }

    /// Build the verified email store backed by this environment.
    pub fn verified_emails(&self) -> LmdbVerifiedEmailStore {
        LmdbVerifiedEmailStore {
            env: self.env.clone(),
            entries_db: self.entries_db,
            hash_index_db: self.hash_index_db,
            meta_db: self.meta_db,
        }
    }
}
