// Key text vectors: hex as configured in site settings and the bytes it denotes

/// Hex key text and its decoded value
pub struct KeyTextVector {
    pub text: &'static str,
    pub bytes: Vec<u8>,
}

pub fn valid_key_texts() -> Vec<KeyTextVector> {
    vec![
        KeyTextVector {
            text: "0F75CA46",
            bytes: vec![0x0F, 0x75, 0xCA, 0x46],
        },
        KeyTextVector {
            text: "0f75ca46",
            bytes: vec![0x0F, 0x75, 0xCA, 0x46],
        },
        KeyTextVector {
            text: "",
            bytes: Vec::new(),
        },
        KeyTextVector {
            text: "00FF00FF00FF00FF00FF00FF00FF00FF",
            bytes: [0x00, 0xFF].repeat(8),
        },
    ]
}

/// Key texts that must be rejected as malformed
pub fn malformed_key_texts() -> Vec<&'static str> {
    vec!["0F7", "0G75CA46", "0F75CA4", "zz", "0F 75", "0x0F75"]
}
