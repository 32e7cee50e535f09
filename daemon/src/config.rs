//! Daemon configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use foyer_mediator::Member;
use foyer_types::{EmailAddress, MemberId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Configuration for the Foyer gateway daemon.
///
/// Can be loaded from a TOML file via [`DaemonConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Data directory for the verified-email store.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// API server port.
    #[serde(default = "default_api_port")]
    pub port: u16,

    /// LMDB map size in megabytes.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub site: SiteConfig,

    /// Member roster served by the static directory.
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

/// Host-site identity used in message templates and URLs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_site_url")]
    pub url: String,
}

/// One reachable member, as configured.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberConfig {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub slug: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./foyer_data")
}

fn default_api_port() -> u16 {
    7080
}

fn default_map_size_mb() -> usize {
    256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_site_name() -> String {
    "Foyer".to_string()
}

fn default_site_url() -> String {
    "http://localhost".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            url: default_site_url(),
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            port: default_api_port(),
            map_size_mb: default_map_size_mb(),
            log_level: default_log_level(),
            site: SiteConfig::default(),
            members: Vec::new(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Config(e.to_string()))
    }

    /// Resolve the configured roster into directory members, validating
    /// every address.
    pub fn resolve_members(&self) -> Result<Vec<Member>, ConfigError> {
        self.members
            .iter()
            .map(|m| {
                let email = EmailAddress::parse(&m.email).map_err(|e| {
                    ConfigError::Config(format!("member {} ({}): {e}", m.id, m.slug))
                })?;
                Ok(Member {
                    id: MemberId::new(m.id),
                    name: m.name.clone(),
                    email,
                    slug: m.slug.clone(),
                })
            })
            .collect()
    }
}
