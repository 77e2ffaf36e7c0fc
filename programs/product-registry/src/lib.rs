//! Product Registry
//!
//! Stores one `Product` account per (authority, NFC tag) pair. The account
//! lives at a PDA derived from `[b"product", authority, nfc_id]`, so a tag can
//! only ever be registered once per authority: a second `initialize` for the
//! same tag fails inside the system program with "already in use".
//!
//! ## Instructions
//! - `initialize`: create the product account (signed by the authority)
//! - `verify_product`: read-only check, returns `true` when the stored record
//!   matches the tag. Intended to be simulated, not submitted.

use anchor_lang::prelude::*;

pub mod error;
pub mod instructions;
pub mod state;

#[cfg(test)]
mod tests;

pub use instructions::*;

declare_id!("HuLb1rPWYEhoNztit5EQ6zC6q7tHzuUvvCgZLMuBcBHr");

#[program]
pub mod product_registry {
    use super::*;

    /// Register a product under the signing authority
    pub fn initialize(ctx: Context<Initialize>, nfc_id: String, product_id: String) -> Result<()> {
        instructions::initialize::handler(ctx, nfc_id, product_id)
    }

    /// Check that the account at the tag's PDA holds a record for that tag
    pub fn verify_product(ctx: Context<VerifyProduct>, nfc_id: String) -> Result<bool> {
        instructions::verify_product::handler(ctx, nfc_id)
    }
}
