//! Timestamp rendering helpers.

use chrono::{DateTime, SecondsFormat};
use foyer_types::Timestamp;

/// Render a timestamp as an ISO-8601/RFC-3339 UTC string, e.g.
/// `2026-08-30T12:00:00Z`.
pub fn format_iso8601(at: Timestamp) -> String {
    DateTime::from_timestamp(at.as_secs() as i64, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_default()
}
