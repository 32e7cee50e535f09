//! Site-level context, built once at startup and passed by reference.

use serde::{Deserialize, Serialize};

/// Everything message templates and URL building need to know about the
/// host site. Constructed by the daemon from its configuration; no component
/// reaches for ambient global state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteContext {
    /// Human-readable site name, used in email subjects.
    pub name: String,
    /// Base URL of the site, without a trailing slash.
    pub base_url: String,
    /// Service version reported in logs.
    pub version: String,
}

impl SiteContext {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            name: name.into(),
            base_url,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// URL of a member's contact page.
    pub fn member_url(&self, slug: &str) -> String {
        format!("{}/members/{}/", self.base_url, slug)
    }
}
