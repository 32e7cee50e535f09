//! Query-string parameters for the listing endpoint.

use foyer_store::{EntryQuery, OrderBy, OrderDir, TriState, DEFAULT_PER_PAGE};
use foyer_types::EmailHash;
use serde::Deserialize;

/// Listing parameters as they arrive on the wire. Unrecognised values
/// fall back to the defaults rather than failing the request.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ListParams {
    pub page: u32,
    pub per_page: u32,
    pub orderby: String,
    pub order: String,
    pub confirmed: String,
    pub spammed: String,
    pub email: Option<String>,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            orderby: "date_confirmed".to_string(),
            order: "desc".to_string(),
            confirmed: "any".to_string(),
            spammed: "any".to_string(),
            email: None,
        }
    }
}

fn tri_state(value: &str) -> TriState {
    match value {
        "true" | "1" => TriState::Only(true),
        "false" | "0" => TriState::Only(false),
        _ => TriState::Any,
    }
}

impl ListParams {
    pub fn to_query(&self) -> EntryQuery {
        let order_by = match self.orderby.as_str() {
            "date_last_email_sent" => OrderBy::DateLastEmailSent,
            "id" => OrderBy::Id,
            _ => OrderBy::DateConfirmed,
        };
        let order_dir = match self.order.as_str() {
            "asc" => OrderDir::Asc,
            _ => OrderDir::Desc,
        };
        EntryQuery {
            confirmed: tri_state(&self.confirmed),
            spam: tri_state(&self.spammed),
            email_hash: self.email.as_deref().map(EmailHash::of_raw),
            order_by,
            order_dir,
            page: self.page.max(1),
            per_page: self.per_page,
        }
    }
}
