use anchor_lang::prelude::*;

#[error_code]
pub enum ProductRegistryError {
    #[msg("NFC tag id must not be empty")]
    EmptyNfcId,

    #[msg("NFC tag id exceeds 32 bytes")]
    NfcIdTooLong,

    #[msg("Product id must not be empty")]
    EmptyProductId,

    #[msg("Product id exceeds 64 bytes")]
    ProductIdTooLong,
}
