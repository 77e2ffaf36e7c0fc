//! Unit tests for the product registry program
//!
//! These tests verify layout constants and validation without requiring BPF compilation.

#[cfg(test)]
mod unit_tests {
    use anchor_lang::prelude::*;
    use anchor_lang::solana_program::hash::hash;
    use anchor_lang::Discriminator;

    use crate::instructions::initialize::validate_ids;
    use crate::state::Product;

    fn anchor_discriminator(preimage: &str) -> [u8; 8] {
        let mut out = [0u8; 8];
        out.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
        out
    }

    // ==================== Layout Tests ====================

    #[test]
    fn test_product_size() {
        // 8 + 32 + 36 + 68 + 8 + 1
        assert_eq!(Product::SIZE, 153);
    }

    #[test]
    fn test_product_seed() {
        assert_eq!(Product::SEED, b"product");
    }

    #[test]
    fn test_max_nfc_id_len_fits_one_seed() {
        assert_eq!(
            Product::MAX_NFC_ID_LEN,
            anchor_lang::solana_program::pubkey::MAX_SEED_LEN
        );
    }

    #[test]
    fn test_account_discriminator() {
        assert_eq!(Product::DISCRIMINATOR, anchor_discriminator("account:Product"));
    }

    #[test]
    fn test_instruction_discriminators() {
        assert_eq!(
            crate::instruction::Initialize::DISCRIMINATOR,
            anchor_discriminator("global:initialize")
        );
        assert_eq!(
            crate::instruction::VerifyProduct::DISCRIMINATOR,
            anchor_discriminator("global:verify_product")
        );
    }

    #[test]
    fn test_full_record_fits_allocation() {
        let product = Product {
            owner: Pubkey::new_unique(),
            nfc_id: "n".repeat(Product::MAX_NFC_ID_LEN),
            product_id: "p".repeat(Product::MAX_PRODUCT_ID_LEN),
            created_at: i64::MAX,
            bump: 255,
        };
        let encoded = product.try_to_vec().unwrap();
        assert_eq!(encoded.len() + 8, Product::SIZE);
    }

    // ==================== Validation Tests ====================

    #[test]
    fn test_validate_ids_accepts_bounds() {
        assert!(validate_ids("a", "b").is_ok());
        assert!(validate_ids(&"n".repeat(32), &"p".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_ids_rejects_empty() {
        assert!(validate_ids("", "product123").is_err());
        assert!(validate_ids("nfc123", "").is_err());
    }

    #[test]
    fn test_validate_ids_rejects_oversized() {
        assert!(validate_ids(&"n".repeat(33), "product123").is_err());
        assert!(validate_ids("nfc123", &"p".repeat(65)).is_err());
    }

    // ==================== Verification Tests ====================

    #[test]
    fn test_matches_tag() {
        let product = Product {
            owner: Pubkey::new_unique(),
            nfc_id: "nfc123".to_string(),
            product_id: "product123".to_string(),
            created_at: 0,
            bump: 254,
        };

        assert!(product.matches_tag("nfc123"));
        assert!(!product.matches_tag("nfc124"));
    }

    #[test]
    fn test_default_record_never_matches() {
        let product = Product::default();
        assert!(!product.matches_tag(""));
    }

    #[test]
    fn test_pda_is_deterministic_and_tag_scoped() {
        let owner = Pubkey::new_unique();
        let (a, _) = Pubkey::find_program_address(
            &[Product::SEED, owner.as_ref(), b"nfc123"],
            &crate::ID,
        );
        let (b, _) = Pubkey::find_program_address(
            &[Product::SEED, owner.as_ref(), b"nfc123"],
            &crate::ID,
        );
        let (c, _) = Pubkey::find_program_address(
            &[Product::SEED, owner.as_ref(), b"nfc124"],
            &crate::ID,
        );

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
