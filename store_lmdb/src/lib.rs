//! LMDB storage backend for verified email entries.
//!
//! Implements the `foyer-store` trait using the `heed` LMDB bindings.
//! Three databases live in a single environment: `entries` (big-endian id →
//! bincode record), `hash_index` (email hash hex → big-endian id), and
//! `meta` (id counter).

pub mod entries;
pub mod environment;
pub mod error;

pub use entries::LmdbVerifiedEmailStore;
pub use environment::LmdbEnvironment;
pub use error::LmdbError;
