use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<LmdbError> for foyer_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(key) => foyer_store::StoreError::NotFound(key),
            LmdbError::Serialization(msg) => foyer_store::StoreError::Serialization(msg),
            LmdbError::Heed(msg) => foyer_store::StoreError::Backend(msg),
        }
    }
}
