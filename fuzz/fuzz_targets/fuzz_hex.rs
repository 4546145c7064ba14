#![no_main]

use libfuzzer_sys::fuzz_target;
use sitecrypt::key::CryptographicKey;
use sitecrypt::utils;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    match utils::from_hex("fuzz", text) {
        Ok(bytes) => {
            assert_eq!(bytes.len() * 2, text.len());
            assert!(utils::to_hex(&bytes).eq_ignore_ascii_case(text));

            let key = CryptographicKey::from_hex("fuzz", text).expect("same text decoded above");
            assert_eq!(key.value(), &bytes[..]);
        }
        Err(e) => {
            assert!(matches!(e, sitecrypt::CryptoError::FormatError { .. }));
        }
    }
});
