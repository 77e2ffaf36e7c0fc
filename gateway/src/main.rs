//! Registry Gateway - HTTP service and operator CLI for the product registry

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use registry_gateway::config::{
    parse_commitment, parse_program_id, GatewayConfig, DEFAULT_PROGRAM_ID, DEFAULT_RPC_URL,
    DEFAULT_TIMEOUT_SECS,
};
use registry_gateway::telemetry;

mod commands;

use commands::*;

#[derive(Parser)]
#[command(name = "registry-gateway")]
#[command(version = "0.1.0")]
#[command(about = "Register and verify NFC-tagged products on Solana")]
#[command(long_about = r#"
Registry Gateway records products against the NFC tag attached to them.
Each tag maps to one program-derived account under the gateway's authority,
so a tag can be registered once and verified by anyone asking the gateway.

Quick Start:
  1. registry-gateway register --nfc-id nfc123 --product-id product123
  2. registry-gateway verify nfc123
  3. registry-gateway serve            Expose the HTTP API
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Solana RPC URL
    #[arg(long, global = true, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,

    /// Path to the authority keypair file
    #[arg(long, global = true, env = "KEYPAIR_PATH")]
    keypair: Option<PathBuf>,

    /// Product registry program id
    #[arg(long, global = true, env = "PROGRAM_ID", default_value = DEFAULT_PROGRAM_ID)]
    program_id: String,

    /// Anchor IDL of the program (discriminators are computed when omitted)
    #[arg(long, global = true, env = "IDL_PATH")]
    idl: Option<PathBuf>,

    /// Commitment to wait for on submit and to read at (processed, confirmed, finalized)
    #[arg(long, global = true, env = "COMMITMENT", default_value = "confirmed")]
    commitment: String,

    /// Upper bound on each RPC round trip, in seconds
    #[arg(long, global = true, env = "RPC_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "JSON_LOGS")]
    json_logs: bool,
}

impl Cli {
    fn config(&self) -> Result<GatewayConfig> {
        Ok(GatewayConfig {
            rpc_url: self.rpc_url.clone(),
            program_id: parse_program_id(&self.program_id)?,
            idl_path: self.idl.clone(),
            keypair_path: self.keypair.clone(),
            commitment: parse_commitment(&self.commitment)?,
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
        bind: String,
    },

    /// Register a product against its NFC tag
    Register {
        /// NFC tag id (max 32 bytes)
        #[arg(short, long)]
        nfc_id: String,

        /// Product id (max 64 bytes)
        #[arg(short, long)]
        product_id: String,
    },

    /// Check whether a tag belongs to a registered product
    Verify {
        nfc_id: String,
    },

    /// Show the product registered for a tag
    Fetch {
        nfc_id: String,
    },

    /// List registered products
    List {
        /// Only products registered by this authority
        #[arg(long)]
        owner: Option<String>,

        /// Start after this product account
        #[arg(long)]
        after: Option<String>,

        /// Maximum number of products
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show configuration and authority info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.json_logs);

    let config = cli.config()?;

    match cli.command {
        Commands::Serve { bind } => {
            serve::run(&config, &bind).await?;
        }
        Commands::Register { nfc_id, product_id } => {
            register::run(&config, &nfc_id, &product_id).await?;
        }
        Commands::Verify { nfc_id } => {
            verify::run(&config, &nfc_id).await?;
        }
        Commands::Fetch { nfc_id } => {
            fetch::run(&config, &nfc_id).await?;
        }
        Commands::List { owner, after, limit } => {
            list::run(&config, owner.as_deref(), after.as_deref(), limit).await?;
        }
        Commands::Info => {
            info::run(&config).await?;
        }
    }

    Ok(())
}
