// Property tests for the encryption service and key text handling

use proptest::prelude::*;
use sitecrypt::aes::BLOCK_SIZE;
use sitecrypt::resolver::StaticKeyResolver;
use sitecrypt::service::CryptoService;
use sitecrypt::utils;

fn key_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 24),
        prop::collection::vec(any::<u8>(), 32),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(key in key_strategy(), plaintext in prop::collection::vec(any::<u8>(), 0..512)) {
        let service = CryptoService::new(StaticKeyResolver::new(key));

        let encrypted = service.encrypt(&plaintext, None).unwrap();
        let framed = encrypted.value();

        prop_assert!(framed.len() >= BLOCK_SIZE * 2);
        prop_assert_eq!(framed.len(), BLOCK_SIZE + (plaintext.len() / BLOCK_SIZE + 1) * BLOCK_SIZE);
        prop_assert_eq!(service.decrypt_result(&encrypted).unwrap(), plaintext);
    }

    #[test]
    fn prop_string_round_trip(key in key_strategy(), text in ".{0,200}") {
        let service = CryptoService::new(StaticKeyResolver::new(key));

        let encrypted = service.encrypt_str(&text, None).unwrap();
        prop_assert_eq!(service.decrypt_str(encrypted.value(), None).unwrap(), text);
    }

    #[test]
    fn prop_truncated_frames_are_rejected(key in key_strategy(), plaintext in prop::collection::vec(any::<u8>(), 0..128), cut in 1usize..BLOCK_SIZE) {
        let service = CryptoService::new(StaticKeyResolver::new(key));
        let framed = service.encrypt(&plaintext, None).unwrap().into_value();

        let truncated = &framed[..framed.len() - cut];
        let result = service.decrypt(truncated, None);
        prop_assert!(matches!(result, Err(e) if e.is_decryption_error()));
    }

    #[test]
    fn prop_hex_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let lower = utils::to_hex(&bytes);
        prop_assert_eq!(utils::from_hex("prop", &lower).unwrap(), bytes.clone());
        prop_assert_eq!(utils::from_hex("prop", &lower.to_uppercase()).unwrap(), bytes);
    }

    #[test]
    fn prop_odd_length_hex_is_rejected(text in "[0-9a-fA-F]{1,63}") {
        prop_assume!(text.len() % 2 == 1);
        prop_assert!(utils::from_hex("prop", &text).is_err());
    }
}
