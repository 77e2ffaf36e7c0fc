use anchor_lang::prelude::*;

/// A registered product, keyed by the NFC tag attached to it
///
/// The account address is the PDA of `[SEED, owner, nfc_id]`, so the
/// address itself proves which authority registered which tag.
#[account]
#[derive(Default)]
pub struct Product {
    /// Authority that registered the product
    pub owner: Pubkey,

    /// NFC tag id (1..=32 bytes, also used as a PDA seed)
    pub nfc_id: String,

    /// Manufacturer's product identifier (1..=64 bytes)
    pub product_id: String,

    /// Registration timestamp (Unix timestamp)
    pub created_at: i64,

    /// Bump seed for PDA derivation
    pub bump: u8,
}

impl Product {
    pub const SEED: &'static [u8] = b"product";

    /// A single PDA seed can hold at most 32 bytes
    pub const MAX_NFC_ID_LEN: usize = 32;

    pub const MAX_PRODUCT_ID_LEN: usize = 64;

    /// Account discriminator (8) + owner (32) + nfc_id (4 + 32)
    /// + product_id (4 + 64) + created_at (8) + bump (1)
    pub const SIZE: usize =
        8 + 32 + (4 + Self::MAX_NFC_ID_LEN) + (4 + Self::MAX_PRODUCT_ID_LEN) + 8 + 1;

    /// True when this record was written for `nfc_id`
    pub fn matches_tag(&self, nfc_id: &str) -> bool {
        self.owner != Pubkey::default() && self.nfc_id == nfc_id
    }
}
