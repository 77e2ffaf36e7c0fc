//! Anchor IDL loading
//!
//! Takes the discriminators from the program's interface description instead
//! of recomputing them, and catches an IDL built for a different program id.
//! Accepts both the 0.30 layout (top-level `address`, explicit
//! `discriminator` arrays) and the older one (`metadata.address`, camelCase
//! names, no discriminators).

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;

use crate::codec::{
    anchor_discriminator, ProgramInterface, INITIALIZE, PRODUCT_ACCOUNT, VERIFY_PRODUCT,
};

#[derive(Deserialize)]
struct RawIdl {
    address: Option<String>,
    name: Option<String>,
    metadata: Option<RawMetadata>,
    #[serde(default)]
    instructions: Vec<RawItem>,
    #[serde(default)]
    accounts: Vec<RawItem>,
}

#[derive(Deserialize)]
struct RawMetadata {
    name: Option<String>,
    address: Option<String>,
}

#[derive(Deserialize)]
struct RawItem {
    name: String,
    discriminator: Option<Vec<u8>>,
}

/// What the gateway takes from an IDL
#[derive(Debug, Clone)]
pub struct ProgramIdl {
    pub name: Option<String>,
    pub address: Option<Pubkey>,
    pub interface: ProgramInterface,
}

impl ProgramIdl {
    /// Fail when the IDL names a different program than the one configured
    pub fn check_address(&self, program_id: &Pubkey) -> Result<()> {
        match self.address {
            Some(address) if address != *program_id => bail!(
                "IDL was built for program {} but the gateway is configured for {}",
                address,
                program_id
            ),
            _ => Ok(()),
        }
    }
}

pub fn load_idl(path: &Path) -> Result<ProgramIdl> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read IDL file {}", path.display()))?;
    parse_idl(&json).with_context(|| format!("Failed to parse IDL file {}", path.display()))
}

pub fn parse_idl(json: &str) -> Result<ProgramIdl> {
    let raw: RawIdl = serde_json::from_str(json)?;

    let address = raw
        .address
        .as_deref()
        .or_else(|| raw.metadata.as_ref().and_then(|m| m.address.as_deref()))
        .map(|s| s.parse::<Pubkey>())
        .transpose()
        .context("IDL address is not a valid public key")?;

    let name = raw
        .metadata
        .as_ref()
        .and_then(|m| m.name.clone())
        .or(raw.name);

    let interface = ProgramInterface {
        initialize: lookup(&raw.instructions, "global", INITIALIZE, "instruction")?,
        verify_product: lookup(&raw.instructions, "global", VERIFY_PRODUCT, "instruction")?,
        product_account: lookup(&raw.accounts, "account", PRODUCT_ACCOUNT, "account")?,
    };

    Ok(ProgramIdl {
        name,
        address,
        interface,
    })
}

fn lookup(items: &[RawItem], namespace: &str, name: &str, what: &str) -> Result<[u8; 8]> {
    let wanted = to_snake_case(name);
    let item = items
        .iter()
        .find(|item| to_snake_case(&item.name) == wanted)
        .with_context(|| format!("IDL does not declare {what} `{name}`"))?;

    match &item.discriminator {
        Some(bytes) => bytes
            .as_slice()
            .try_into()
            .with_context(|| format!("{what} `{name}` has a {}-byte discriminator", bytes.len())),
        None => Ok(anchor_discriminator(namespace, name)),
    }
}

/// `verifyProduct` → `verify_product`, `Product` → `product`
pub(crate) fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for (i, ch) in name.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
