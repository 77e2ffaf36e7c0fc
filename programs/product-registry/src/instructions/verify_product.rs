use anchor_lang::prelude::*;
use crate::state::Product;

/// Accounts for the verify_product instruction
#[derive(Accounts)]
#[instruction(nfc_id: String)]
pub struct VerifyProduct<'info> {
    /// Must sit at the PDA of the tag under the recorded owner
    #[account(
        seeds = [Product::SEED, product.owner.as_ref(), nfc_id.as_bytes()],
        bump = product.bump,
    )]
    pub product: Account<'info, Product>,
}

/// Returns whether the product account holds a record for `nfc_id`
///
/// Anchor fails account validation before this runs when the account does not
/// exist, so callers see "not initialized" as an error rather than `false`.
pub fn handler(ctx: Context<VerifyProduct>, nfc_id: String) -> Result<bool> {
    let product = &ctx.accounts.product;
    let authentic = product.matches_tag(&nfc_id);

    msg!("Verification for tag {}: {}", nfc_id, authentic);

    Ok(authentic)
}
