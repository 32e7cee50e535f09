//! Foyer daemon — entry point for running the contact gateway.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use config::DaemonConfig;
use foyer_mediator::{ContactMediator, LogMailer, MemberDirectory, StaticDirectory};
use foyer_rpc::{ApiServer, AppState, CapabilityPolicy};
use foyer_store_lmdb::LmdbEnvironment;
use foyer_types::SiteContext;
use foyer_verification::VerificationEngine;

#[derive(Parser)]
#[command(name = "foyer-daemon", about = "Foyer contact gateway daemon")]
struct Cli {
    /// Data directory for the verified-email store.
    #[arg(long, env = "FOYER_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// API server port.
    #[arg(long, env = "FOYER_PORT")]
    port: Option<u16>,

    /// Site name used in outgoing message subjects.
    #[arg(long, env = "FOYER_SITE_NAME")]
    site_name: Option<String>,

    /// Base URL of the host site.
    #[arg(long, env = "FOYER_SITE_URL")]
    site_url: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    foyer_utils::init_tracing();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => {
            let loaded = DaemonConfig::from_toml_file(&path.display().to_string())?;
            tracing::info!("Loaded config from {}", path.display());
            loaded
        }
        None => DaemonConfig::default(),
    };
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(name) = cli.site_name {
        config.site.name = name;
    }
    if let Some(url) = cli.site_url {
        config.site.url = url;
    }

    let site = SiteContext::new(&config.site.name, &config.site.url);
    tracing::info!(
        "Starting Foyer gateway for {} (API:{}, data:{})",
        site.name,
        config.port,
        config.data_dir.display(),
    );

    let environment =
        LmdbEnvironment::open(&config.data_dir, config.map_size_mb * 1024 * 1024)?;
    let store = Arc::new(environment.verified_emails());
    let engine = Arc::new(VerificationEngine::new(store));

    let members = config.resolve_members()?;
    if members.is_empty() {
        tracing::warn!("no members configured; every contact attempt will fail");
    }
    let directory: Arc<dyn MemberDirectory> = Arc::new(StaticDirectory::new(members));

    let mediator = Arc::new(ContactMediator::new(
        engine.clone(),
        directory.clone(),
        Arc::new(LogMailer),
        site,
    ));

    let state = Arc::new(AppState {
        engine,
        mediator,
        directory,
        policy: Arc::new(CapabilityPolicy),
    });
    ApiServer::new(state, config.port).start().await
}
