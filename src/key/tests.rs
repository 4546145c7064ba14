use super::*;
use crate::error::error_codes;

const TEST_KEY: &str = "0F75CA46E7EBDD39E4CA6B074D1F9A5972B849A55F91A248";

#[test]
fn test_key_from_hex() {
    let key = CryptographicKey::from_hex("testkey", TEST_KEY).unwrap();

    assert_eq!(key.id(), "testkey");
    assert_eq!(key.len(), 24);
    assert_eq!(&key.value()[..4], &[0x0F, 0x75, 0xCA, 0x46]);
    assert_eq!(key.to_hex(), TEST_KEY.to_lowercase());
}

#[test]
fn test_key_from_malformed_hex() {
    let err = CryptographicKey::from_hex("testkey", "0F75CA4").unwrap_err();
    assert_eq!(err.error_code(), error_codes::HEX_ODD_LENGTH);

    let err = CryptographicKey::from_hex("testkey", "XX").unwrap_err();
    assert_eq!(err.error_code(), error_codes::HEX_INVALID_CHARACTER);
}

#[test]
fn test_to_vec_is_independent_copy() {
    let key = CryptographicKey::new("k", vec![1u8, 2, 3]);

    let mut copy = key.to_vec();
    copy[0] = 0xFF;

    assert_eq!(key.value(), &[1, 2, 3]);
}

#[test]
fn test_generate_produces_distinct_keys() {
    let a = CryptographicKey::generate("a").unwrap();
    let b = CryptographicKey::generate("a").unwrap();

    assert_eq!(a.len(), GENERATED_KEY_SIZE);
    assert_ne!(a, b);
}

#[test]
fn test_debug_redacts_value() {
    let key = CryptographicKey::from_hex("secret", "DEADBEEF").unwrap();
    let debug = format!("{:?}", key);

    assert!(debug.contains("secret"));
    assert!(debug.contains("REDACTED"));
    assert!(!debug.to_lowercase().contains("deadbeef"));
}

#[test]
fn test_default_key_id() {
    let key = CryptographicKey::new(DEFAULT_KEY_ID, vec![0u8; 16]);
    assert!(key.is_default());
    assert!(!CryptographicKey::new(DEFAULT_KEY_ALIAS, vec![0u8; 16]).is_default());
}

#[test]
fn test_key_ring_deduplicates_ids() {
    let mut ring = KeyRing::new();

    assert!(ring.push(CryptographicKey::new("a", vec![1u8; 16])));
    assert!(ring.push(CryptographicKey::new("b", vec![2u8; 16])));
    assert!(!ring.push(CryptographicKey::new("a", vec![3u8; 16])));

    assert_eq!(ring.len(), 2);
    assert_eq!(ring.ids(), vec!["a", "b"]);
    // The first entry wins
    assert_eq!(ring.get("a").unwrap().value(), &[1u8; 16]);
}

#[test]
fn test_key_ring_primary_and_order() {
    let ring: KeyRing = vec![
        CryptographicKey::new("p", vec![1u8; 16]),
        CryptographicKey::new("s", vec![2u8; 16]),
    ]
    .into_iter()
    .collect();

    assert_eq!(ring.primary().map(CryptographicKey::id), Some("p"));
    let ids: Vec<String> = ring.iter().map(|k| k.id().to_string()).collect();
    assert_eq!(ids, vec!["p", "s"]);
}

#[test]
fn test_empty_key_ring() {
    let ring = KeyRing::new();
    assert!(ring.is_empty());
    assert!(ring.primary().is_none());
    assert!(!ring.contains(DEFAULT_KEY_ID));
}

#[test]
fn test_key_zeroized_on_drop_only() {
    fn assert_zeroize_on_drop<T: zeroize::ZeroizeOnDrop>() {}
    assert_zeroize_on_drop::<CryptographicKey>();

    // Dropping a copy wipes that copy, never the key it came from
    let key = CryptographicKey::new("k", vec![0x5A; 16]);
    let copy = key.clone();
    drop(copy);
    assert_eq!(key.value(), &[0x5A; 16]);
}
