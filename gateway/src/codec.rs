//! Wire layout of the product-registry program
//!
//! Instruction data is `discriminator || borsh(args)`; account data is
//! `discriminator || borsh(Product)` zero-padded to the fixed allocation.

use std::io;

use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;

/// Account discriminator (8) + owner (32) + nfc_id (4 + 32)
/// + product_id (4 + 64) + created_at (8) + bump (1)
pub const PRODUCT_ACCOUNT_SIZE: usize = 8 + 32 + (4 + 32) + (4 + 64) + 8 + 1;

/// Offset of the owner field inside account data
pub const OWNER_OFFSET: usize = 8;

pub const INITIALIZE: &str = "initialize";
pub const VERIFY_PRODUCT: &str = "verify_product";
pub const PRODUCT_ACCOUNT: &str = "Product";

/// Anchor discriminator: first 8 bytes of sha256("<namespace>:<name>")
pub fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let digest = Sha256::digest(format!("{namespace}:{name}").as_bytes());
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest[..8]);
    out
}

/// Discriminators the gateway needs to talk to the program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramInterface {
    pub initialize: [u8; 8],
    pub verify_product: [u8; 8],
    pub product_account: [u8; 8],
}

impl Default for ProgramInterface {
    fn default() -> Self {
        Self {
            initialize: anchor_discriminator("global", INITIALIZE),
            verify_product: anchor_discriminator("global", VERIFY_PRODUCT),
            product_account: anchor_discriminator("account", PRODUCT_ACCOUNT),
        }
    }
}

/// A program method invocation, before it is bound to accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgramCall {
    Initialize { nfc_id: String, product_id: String },
    VerifyProduct { nfc_id: String },
}

#[derive(BorshSerialize)]
struct InitializeArgs {
    nfc_id: String,
    product_id: String,
}

#[derive(BorshSerialize)]
struct VerifyProductArgs {
    nfc_id: String,
}

impl ProgramCall {
    pub fn method(&self) -> &'static str {
        match self {
            Self::Initialize { .. } => INITIALIZE,
            Self::VerifyProduct { .. } => VERIFY_PRODUCT,
        }
    }

    /// True for calls that change ledger state and must be signed and submitted
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::Initialize { .. })
    }

    /// Encode as instruction data
    pub fn encode(&self, interface: &ProgramInterface) -> io::Result<Vec<u8>> {
        let mut data = Vec::new();
        match self {
            Self::Initialize { nfc_id, product_id } => {
                data.extend_from_slice(&interface.initialize);
                let args = InitializeArgs {
                    nfc_id: nfc_id.clone(),
                    product_id: product_id.clone(),
                };
                BorshSerialize::serialize(&args, &mut data)?;
            }
            Self::VerifyProduct { nfc_id } => {
                data.extend_from_slice(&interface.verify_product);
                let args = VerifyProductArgs {
                    nfc_id: nfc_id.clone(),
                };
                BorshSerialize::serialize(&args, &mut data)?;
            }
        }
        Ok(data)
    }
}

/// On-chain product account (must match program)
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProductAccount {
    pub owner: Pubkey,
    pub nfc_id: String,
    pub product_id: String,
    pub created_at: i64,
    pub bump: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("account data too short: {0} bytes")]
    TooShort(usize),

    #[error("discriminator mismatch")]
    WrongDiscriminator,

    #[error("malformed product record: {0}")]
    Malformed(String),
}

impl ProductAccount {
    /// Decode account data; trailing padding is ignored
    pub fn decode(data: &[u8], interface: &ProgramInterface) -> Result<Self, DecodeError> {
        if data.len() < 8 {
            return Err(DecodeError::TooShort(data.len()));
        }
        if data[..8] != interface.product_account {
            return Err(DecodeError::WrongDiscriminator);
        }

        let mut body = &data[8..];
        Self::deserialize(&mut body).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Encode the way the program lays the account out, including padding
    pub fn encode(&self, interface: &ProgramInterface) -> io::Result<Vec<u8>> {
        let mut data = Vec::with_capacity(PRODUCT_ACCOUNT_SIZE);
        data.extend_from_slice(&interface.product_account);
        BorshSerialize::serialize(self, &mut data)?;
        if data.len() < PRODUCT_ACCOUNT_SIZE {
            data.resize(PRODUCT_ACCOUNT_SIZE, 0);
        }
        Ok(data)
    }
}

/// Decode `verify_product` return data
///
/// The runtime strips trailing zero bytes from return data, so `false`
/// arrives as an empty buffer.
pub fn decode_bool_return(data: &[u8]) -> Result<bool, DecodeError> {
    match data.first() {
        None | Some(0) => Ok(false),
        Some(1) => Ok(true),
        Some(other) => Err(DecodeError::Malformed(format!("invalid bool byte {other}"))),
    }
}
