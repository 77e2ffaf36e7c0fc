use anchor_lang::prelude::*;
use crate::error::ProductRegistryError;
use crate::state::Product;

/// Accounts for the initialize instruction
#[derive(Accounts)]
#[instruction(nfc_id: String)]
pub struct Initialize<'info> {
    /// The registrar; pays for and owns the product account
    #[account(mut)]
    pub authority: Signer<'info>,

    /// The product PDA. `init` makes a second registration of the same tag fail.
    #[account(
        init,
        payer = authority,
        space = Product::SIZE,
        seeds = [Product::SEED, authority.key().as_ref(), nfc_id.as_bytes()],
        bump,
    )]
    pub product: Account<'info, Product>,

    /// System program for account creation
    pub system_program: Program<'info, System>,
}

/// Register a product against its NFC tag
///
/// # Arguments
/// * `nfc_id` - Tag identifier, 1..=32 bytes
/// * `product_id` - Product identifier, 1..=64 bytes
pub fn handler(ctx: Context<Initialize>, nfc_id: String, product_id: String) -> Result<()> {
    validate_ids(&nfc_id, &product_id)?;

    let product = &mut ctx.accounts.product;
    let clock = Clock::get()?;

    product.owner = ctx.accounts.authority.key();
    product.nfc_id = nfc_id;
    product.product_id = product_id;
    product.created_at = clock.unix_timestamp;
    product.bump = ctx.bumps.product;

    msg!(
        "Product {} registered for tag {} by {}",
        product.product_id,
        product.nfc_id,
        product.owner
    );

    Ok(())
}

pub(crate) fn validate_ids(nfc_id: &str, product_id: &str) -> Result<()> {
    require!(!nfc_id.is_empty(), ProductRegistryError::EmptyNfcId);
    require!(
        nfc_id.len() <= Product::MAX_NFC_ID_LEN,
        ProductRegistryError::NfcIdTooLong
    );
    require!(!product_id.is_empty(), ProductRegistryError::EmptyProductId);
    require!(
        product_id.len() <= Product::MAX_PRODUCT_ID_LEN,
        ProductRegistryError::ProductIdTooLong
    );
    Ok(())
}
