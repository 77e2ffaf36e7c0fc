//! Gateway configuration and authority key loading
//!
//! The whole external surface is: RPC endpoint, program id, optional IDL,
//! the authority key file, and the commitment/timeout knobs.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey, signature::Keypair};
use zeroize::Zeroize;

use crate::codec::ProgramInterface;
use crate::idl::load_idl;
use crate::ledger::{RpcLedger, RpcLedgerConfig};
use crate::registry::ProductRegistry;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";

/// Program ID (matches `declare_id!` in the product-registry program)
pub const DEFAULT_PROGRAM_ID: &str = "HuLb1rPWYEhoNztit5EQ6zC6q7tHzuUvvCgZLMuBcBHr";

/// Bound on each RPC round trip, confirmation waits included
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub idl_path: Option<PathBuf>,
    pub keypair_path: Option<PathBuf>,
    pub commitment: CommitmentConfig,
    pub timeout: Duration,
}

impl GatewayConfig {
    /// Discriminators from the IDL when one is configured, computed otherwise
    pub fn program_interface(&self) -> Result<ProgramInterface> {
        match &self.idl_path {
            Some(path) => {
                let idl = load_idl(path)?;
                idl.check_address(&self.program_id)?;
                Ok(idl.interface)
            }
            None => Ok(ProgramInterface::default()),
        }
    }

    /// Load the authority and build a registry backed by the RPC node
    pub fn connect(&self) -> Result<ProductRegistry<RpcLedger>> {
        let authority = load_authority(self.keypair_path.as_deref())?;
        let interface = self.program_interface()?;

        let ledger = RpcLedger::new(
            RpcLedgerConfig {
                rpc_url: self.rpc_url.clone(),
                program_id: self.program_id,
                interface,
                commitment: self.commitment,
                timeout: self.timeout,
            },
            authority,
        );

        Ok(ProductRegistry::new(ledger, interface))
    }
}

/// Default Solana keypair location
pub fn default_keypair_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".config").join("solana").join("id.json"))
}

/// Load the authority keypair from file or the default location
///
/// Accepts the `solana-keygen` JSON byte array or a base58-encoded secret.
pub fn load_authority(path: Option<&Path>) -> Result<Keypair> {
    let keypair_path = match path {
        Some(p) => p.to_path_buf(),
        None => default_keypair_path()?,
    };

    if !keypair_path.exists() {
        bail!(
            "Authority keypair not found at {:?}. Generate one with 'solana-keygen new' or set --keypair",
            keypair_path
        );
    }

    let mut contents = fs::read_to_string(&keypair_path)
        .with_context(|| format!("Failed to read keypair file {:?}", keypair_path))?;
    let keypair = parse_keypair(contents.trim());
    contents.zeroize();

    keypair.with_context(|| format!("Invalid keypair file {:?}", keypair_path))
}

pub fn parse_keypair(encoded: &str) -> Result<Keypair> {
    let mut bytes: Vec<u8> = if encoded.starts_with('[') {
        serde_json::from_str(encoded).context("Failed to parse keypair JSON")?
    } else {
        bs58::decode(encoded)
            .into_vec()
            .context("Keypair is neither a JSON byte array nor base58")?
    };

    let keypair = Keypair::from_bytes(&bytes);
    bytes.zeroize();

    keypair.map_err(|e| anyhow::anyhow!("Invalid keypair bytes: {}", e))
}

pub fn parse_commitment(level: &str) -> Result<CommitmentConfig> {
    match level.to_ascii_lowercase().as_str() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => bail!("Unknown commitment level '{}': expected processed, confirmed or finalized", other),
    }
}

pub fn parse_program_id(input: &str) -> Result<Pubkey> {
    input
        .parse()
        .with_context(|| format!("Invalid program id '{}'", input))
}
