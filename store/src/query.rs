//! Query, filter, and pagination types for entry listings.
//!
//! [`EntryQuery::evaluate`] holds the filtering/ordering/pagination
//! semantics in one place so every backend behaves identically; backends
//! only differ in how they produce the candidate rows.

use crate::entry::VerifiedEmailEntry;
use foyer_types::EmailHash;
use serde::{Deserialize, Serialize};

/// Default page size for listings.
pub const DEFAULT_PER_PAGE: u32 = 20;

/// Maximum allowed page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Tri-state filter on a boolean column: match anything, or only one value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriState {
    #[default]
    Any,
    Only(bool),
}

impl TriState {
    pub fn matches(&self, value: bool) -> bool {
        match self {
            TriState::Any => true,
            TriState::Only(wanted) => *wanted == value,
        }
    }
}

/// Sort key for listings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    #[default]
    DateConfirmed,
    DateLastEmailSent,
    Id,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderDir {
    Asc,
    #[default]
    Desc,
}

/// Filters, ordering, and pagination for one listing request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryQuery {
    pub confirmed: TriState,
    pub spam: TriState,
    /// Exact match on the email hash. The caller hashes the plaintext
    /// before querying; the store never sees an address.
    pub email_hash: Option<EmailHash>,
    pub order_by: OrderBy,
    pub order_dir: OrderDir,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl Default for EntryQuery {
    fn default() -> Self {
        Self {
            confirmed: TriState::Any,
            spam: TriState::Any,
            email_hash: None,
            order_by: OrderBy::default(),
            order_dir: OrderDir::default(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPage {
    pub entries: Vec<VerifiedEmailEntry>,
    /// Total matching entries, independent of pagination.
    pub total: u64,
}

impl EntryPage {
    /// Number of pages at this query's page size.
    pub fn total_pages(&self, per_page: u32) -> u64 {
        if per_page == 0 {
            return 0;
        }
        self.total.div_ceil(per_page as u64)
    }
}

impl EntryQuery {
    /// Effective page size, clamped to `[1, MAX_PER_PAGE]`.
    pub fn effective_per_page(&self) -> u32 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    /// Apply filters, ordering, and pagination to a candidate set.
    pub fn evaluate(&self, mut entries: Vec<VerifiedEmailEntry>) -> EntryPage {
        entries.retain(|e| {
            self.confirmed.matches(e.is_confirmed)
                && self.spam.matches(e.is_spam)
                && self
                    .email_hash
                    .as_ref()
                    .map_or(true, |hash| e.email_hash == *hash)
        });

        // Absent dates sort before any present date; id breaks ties so the
        // order is stable across backends.
        entries.sort_by(|a, b| {
            let ordering = match self.order_by {
                OrderBy::DateConfirmed => a.date_confirmed.cmp(&b.date_confirmed),
                OrderBy::DateLastEmailSent => {
                    a.date_last_email_sent.cmp(&b.date_last_email_sent)
                }
                OrderBy::Id => std::cmp::Ordering::Equal,
            };
            ordering.then(a.id.cmp(&b.id))
        });
        if self.order_dir == OrderDir::Desc {
            entries.reverse();
        }

        let total = entries.len() as u64;
        let per_page = self.effective_per_page() as usize;
        let offset = (self.page.max(1) as usize - 1) * per_page;
        let entries = entries.into_iter().skip(offset).take(per_page).collect();

        EntryPage { entries, total }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foyer_types::Timestamp;

    fn entry(id: u64, confirmed: bool, spam: bool) -> VerifiedEmailEntry {
        let mut e = VerifiedEmailEntry::new(
            id,
            EmailHash::of_raw(&format!("user{id}@test.com")),
            "0123456789abcdef",
        );
        e.is_confirmed = confirmed;
        e.is_spam = spam;
        if confirmed {
            e.date_confirmed = Some(Timestamp::new(1000 + id));
        }
        e
    }

    fn corpus() -> Vec<VerifiedEmailEntry> {
        vec![
            entry(1, false, false),
            entry(2, true, false),
            entry(3, true, true),
            entry(4, false, true),
            entry(5, true, false),
        ]
    }

    #[test]
    fn tri_state_filters_combine() {
        let query = EntryQuery {
            confirmed: TriState::Only(true),
            spam: TriState::Only(false),
            ..Default::default()
        };
        let page = query.evaluate(corpus());
        assert_eq!(page.total, 2);
        let ids: Vec<u64> = page.entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 2]);
    }

    #[test]
    fn total_reflects_filtered_set_not_page_size() {
        let query = EntryQuery {
            per_page: 2,
            ..Default::default()
        };
        let page = query.evaluate(corpus());
        assert_eq!(page.total, 5);
        assert_eq!(page.entries.len(), 2);
    }

    #[test]
    fn pagination_pages_through_everything() {
        let query = EntryQuery {
            per_page: 2,
            page: 3,
            order_by: OrderBy::Id,
            order_dir: OrderDir::Asc,
            ..Default::default()
        };
        let page = query.evaluate(corpus());
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].id, 5);
        assert_eq!(page.total_pages(2), 3);
    }

    #[test]
    fn email_hash_filter_is_exact() {
        let query = EntryQuery {
            email_hash: Some(EmailHash::of_raw("user3@test.com")),
            ..Default::default()
        };
        let page = query.evaluate(corpus());
        assert_eq!(page.total, 1);
        assert_eq!(page.entries[0].id, 3);
    }

    #[test]
    fn default_order_is_confirmation_date_descending() {
        let page = EntryQuery::default().evaluate(corpus());
        let ids: Vec<u64> = page.entries.iter().map(|e| e.id).collect();
        // Confirmed entries (latest confirmation first), then unconfirmed.
        assert_eq!(ids, vec![5, 3, 2, 4, 1]);
    }

    #[test]
    fn per_page_is_clamped() {
        let query = EntryQuery {
            per_page: 10_000,
            ..Default::default()
        };
        assert_eq!(query.effective_per_page(), MAX_PER_PAGE);
    }
}
