//! Tag id → product account address
//!
//! Must stay byte-for-byte in line with the program's
//! `seeds = [b"product", authority, nfc_id]`, otherwise reads address an
//! account that was never written.

use solana_sdk::pubkey::{Pubkey, MAX_SEED_LEN};

use crate::error::{RegistryError, Result};

/// Domain-separation prefix, shared with the on-chain program
pub const PRODUCT_SEED: &[u8] = b"product";

/// One PDA seed holds at most 32 bytes
pub const MAX_NFC_ID_LEN: usize = MAX_SEED_LEN;

/// Bounded by the account allocation on-chain
pub const MAX_PRODUCT_ID_LEN: usize = 64;

/// Check a tag id before it is used as a seed
pub fn validate_nfc_id(nfc_id: &str) -> Result<()> {
    if nfc_id.is_empty() {
        return Err(RegistryError::InvalidInput("nfcId is required".into()));
    }
    if nfc_id.len() > MAX_NFC_ID_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "nfcId must be at most {} bytes, got {}",
            MAX_NFC_ID_LEN,
            nfc_id.len()
        )));
    }
    Ok(())
}

pub fn validate_product_id(product_id: &str) -> Result<()> {
    if product_id.is_empty() {
        return Err(RegistryError::InvalidInput("productId is required".into()));
    }
    if product_id.len() > MAX_PRODUCT_ID_LEN {
        return Err(RegistryError::InvalidInput(format!(
            "productId must be at most {} bytes, got {}",
            MAX_PRODUCT_ID_LEN,
            product_id.len()
        )));
    }
    Ok(())
}

/// Derive the product PDA for `(owner, nfc_id)` under `program_id`
pub fn derive_product_address(program_id: &Pubkey, owner: &Pubkey, nfc_id: &str) -> Result<Pubkey> {
    validate_nfc_id(nfc_id)?;

    Pubkey::try_find_program_address(
        &[PRODUCT_SEED, owner.as_ref(), nfc_id.as_bytes()],
        program_id,
    )
    .map(|(address, _bump)| address)
    .ok_or_else(|| {
        RegistryError::InvalidInput(format!("no valid program address for nfcId {nfc_id:?}"))
    })
}
