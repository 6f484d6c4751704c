//! Glasspane entry point.
//!
//! This binary is the composition root:
//!
//! 1. **Load configuration**: figment layers of defaults, `glasspane.toml` and
//!    `GLASSPANE_*` environment variables (see [`config`]).
//! 2. **Wire observability**: `tracing-subscriber` with a pretty or JSON layer
//!    and an optional OTLP exporter (see [`telemetry`]).
//! 3. **Construct infrastructure**: the seeded [`store::MemoryStore`], the
//!    AES-GCM credential vault, the bcrypt verifier and the Linear client, all
//!    injected into the gateway.
//! 4. **Run a command**: serve the HTTP API, or one of the operator helpers
//!    that produce values for the seed file.

mod config;
mod telemetry;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use domain::AccessGate;
use gateway::{FormAdmin, GatewayPorts, ViewGateway};
use server::AppState;
use store::MemoryStore;
use tracing::{info, warn};
use tracker::LinearClient;
use vault::{AesGcmVault, BcryptVerifier};

use crate::config::GlasspaneConfig;

/// Glasspane: public, read-only windows onto an issue tracker.
#[derive(Debug, Parser)]
#[command(name = "glasspane", version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "GLASSPANE_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the visitor and owner HTTP API
    Serve {
        /// Overrides `server.listen_addr`
        #[arg(short, long)]
        listen: Option<SocketAddr>,
    },

    /// Print a bcrypt hash for a view password
    HashPassword {
        password: String,

        /// Overrides `password.cost`
        #[arg(long)]
        cost: Option<u32>,
    },

    /// Encrypt an owner's tracker API key with `vault.key`
    EncryptCredential {
        #[arg(required_unless_present = "generate_key")]
        credential: Option<String>,

        /// Print a fresh base64 vault key instead
        #[arg(long, conflicts_with = "credential")]
        generate_key: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = GlasspaneConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { listen } => {
            if let Some(listen) = listen {
                config.server.listen_addr = listen;
            }
            let guard = telemetry::init_tracing(&config.log, &config.telemetry)?;
            let outcome = serve(&config).await;
            guard.shutdown();
            outcome
        }
        Command::HashPassword { password, cost } => {
            let cost = cost.unwrap_or(config.password.cost);
            let hash = vault::hash_password(&password, cost).await?;
            println!("{}", hash.as_str());
            Ok(())
        }
        Command::EncryptCredential {
            credential,
            generate_key,
        } => {
            if generate_key {
                println!("{}", AesGcmVault::generate_key());
                return Ok(());
            }
            let Some(credential) = credential else {
                bail!("a credential is required unless --generate-key is given");
            };
            let vault = AesGcmVault::from_base64_key(config.vault.require_key()?)?;
            println!("{}", vault.encrypt(&credential)?.as_str());
            Ok(())
        }
    }
}

async fn serve(config: &GlasspaneConfig) -> Result<()> {
    let store = match &config.store.seed_path {
        Some(path) => MemoryStore::load(path)
            .await
            .with_context(|| format!("loading seed file {}", path.display()))?,
        None => {
            warn!("no store.seed_path configured, starting with an empty store");
            MemoryStore::new()
        }
    };
    let store = Arc::new(store);

    let vault = AesGcmVault::from_base64_key(config.vault.require_key()?)
        .context("vault.key is not a valid 256-bit base64 key")?;
    let source = LinearClient::new(config.tracker.clone())?;

    let gateway = ViewGateway::new(GatewayPorts {
        views: store.clone(),
        forms: store.clone(),
        profiles: store.clone(),
        vault: Arc::new(vault),
        source: Arc::new(source),
        gate: AccessGate::new(Arc::new(BcryptVerifier)),
    });
    let admin = FormAdmin::new(store.clone(), store.clone(), store);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        tracker = %config.tracker.endpoint,
        "starting glasspane"
    );
    server::run(&config.server, AppState::new(gateway, admin), server::shutdown_signal()).await?;
    Ok(())
}
