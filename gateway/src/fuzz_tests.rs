//! Property-based tests for derivation and account decoding
//!
//! Properties tested:
//! - Determinism: the same (owner, tag) always yields the same address
//! - Injectivity: distinct tags under one owner yield distinct addresses
//! - Validation: any tag over the seed ceiling is refused
//! - Robustness: decoding arbitrary account bytes never panics

#[cfg(test)]
mod property_tests {
    use proptest::prelude::*;
    use solana_sdk::pubkey::Pubkey;

    use crate::codec::{ProductAccount, ProgramInterface};
    use crate::derive::derive_product_address;
    use crate::ledger::ProgramFilter;

    fn arbitrary_pubkey() -> impl Strategy<Value = Pubkey> {
        prop::array::uniform32(any::<u8>()).prop_map(Pubkey::new_from_array)
    }

    // Tags that fit in one seed
    fn valid_tag() -> impl Strategy<Value = String> {
        "[a-zA-Z0-9_-]{1,32}"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_derivation_deterministic(
            program_id in arbitrary_pubkey(),
            owner in arbitrary_pubkey(),
            tag in valid_tag(),
        ) {
            let a = derive_product_address(&program_id, &owner, &tag).unwrap();
            let b = derive_product_address(&program_id, &owner, &tag).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn prop_distinct_tags_distinct_addresses(
            owner in arbitrary_pubkey(),
            (tag1, tag2) in (valid_tag(), valid_tag()).prop_filter("distinct tags", |(a, b)| a != b),
        ) {
            let program_id: Pubkey = crate::config::DEFAULT_PROGRAM_ID.parse().unwrap();
            let a = derive_product_address(&program_id, &owner, &tag1).unwrap();
            let b = derive_product_address(&program_id, &owner, &tag2).unwrap();
            prop_assert_ne!(a, b);
        }

        #[test]
        fn prop_oversized_tags_refused(
            owner in arbitrary_pubkey(),
            tag in "[a-z]{33,80}",
        ) {
            let program_id = Pubkey::new_unique();
            prop_assert!(derive_product_address(&program_id, &owner, &tag).is_err());
        }

        #[test]
        fn prop_decode_arbitrary_bytes_never_panics(data in prop::collection::vec(any::<u8>(), 0..256)) {
            let interface = ProgramInterface::default();
            let _ = ProductAccount::decode(&data, &interface);
        }

        #[test]
        fn prop_stored_record_survives_layout(
            owner in arbitrary_pubkey(),
            nfc_id in valid_tag(),
            product_id in "[ -~]{1,64}",
            created_at in any::<i64>(),
        ) {
            let interface = ProgramInterface::default();
            let record = ProductAccount { owner, nfc_id, product_id, created_at, bump: 255 };
            let data = record.encode(&interface).unwrap();

            prop_assert_eq!(data.len(), crate::codec::PRODUCT_ACCOUNT_SIZE);
            prop_assert_eq!(ProductAccount::decode(&data, &interface).unwrap(), record);

            let filter = ProgramFilter { discriminator: Some(interface.product_account), owner: Some(owner) };
            prop_assert!(filter.matches(&data));
        }
    }
}
