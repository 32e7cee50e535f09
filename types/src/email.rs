//! Email address and email hash types.
//!
//! Addresses are normalized (trimmed, lower-cased) before anything else looks
//! at them. The persistence layer never sees the plaintext address — only its
//! Blake2b-256 hash, hex-encoded.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

type Blake2b256 = Blake2b<U32>;

#[derive(Debug, Error)]
#[error("invalid email address: {0}")]
pub struct EmailParseError(pub String);

/// A syntactically valid, normalized email address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and normalize an address. The check is structural, not an RFC
    /// grammar: one `@`, non-empty local part, dotted domain, no whitespace.
    pub fn parse(raw: &str) -> Result<Self, EmailParseError> {
        let normalized = Self::normalize(raw);

        if normalized.is_empty() {
            return Err(EmailParseError("empty address".to_string()));
        }
        if normalized.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(EmailParseError(normalized));
        }

        let mut parts = normalized.splitn(2, '@');
        let local = parts.next().unwrap_or_default();
        let domain = parts.next().unwrap_or_default();

        if local.is_empty()
            || domain.is_empty()
            || domain.contains('@')
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || domain.contains("..")
        {
            return Err(EmailParseError(normalized));
        }

        Ok(Self(normalized))
    }

    /// Lower-case and trim a raw address. Normalization is idempotent.
    pub fn normalize(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash of this address, the store's lookup key.
    pub fn hash(&self) -> EmailHash {
        EmailHash::of_raw(&self.0)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hex-encoded Blake2b-256 of a normalized email address.
///
/// The one-way image of an address: safe to persist, index, and return to
/// API clients. Two raw strings that normalize identically hash identically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailHash(String);

impl EmailHash {
    /// Hash a validated address.
    pub fn of(address: &EmailAddress) -> Self {
        Self::of_raw(address.as_str())
    }

    /// Hash any raw string after normalization. Used where the caller only
    /// needs a lookup key and format validation is someone else's job
    /// (e.g. the admin list filter).
    pub fn of_raw(raw: &str) -> Self {
        let normalized = EmailAddress::normalize(raw);
        let mut hasher = Blake2b256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
