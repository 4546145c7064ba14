use rand::{rngs::OsRng, RngCore};

use crate::error::{error_codes, CryptoError, CryptoResult};

/// Generate random bytes of the specified length from the OS random source
pub fn random_bytes(length: usize) -> CryptoResult<Vec<u8>> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CryptoError::random_generation_error(&e.to_string()))?;
    Ok(bytes)
}

/// Convert bytes to a lowercase hexadecimal string
pub fn to_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Convert a hexadecimal string to bytes
///
/// Upper and lower case digits are both accepted. `source_name` names the
/// setting the text came from so that a misconfigured value can be traced;
/// it never includes the value itself.
///
/// # Errors
///
/// Returns `CryptoError::FormatError` if the text has an odd number of
/// characters or contains a non-hexadecimal character.
///
/// # Examples
///
/// ```
/// use sitecrypt::utils::from_hex;
///
/// let bytes = from_hex("key", "0F75CA46").unwrap();
/// assert_eq!(bytes, vec![0x0F, 0x75, 0xCA, 0x46]);
/// assert!(from_hex("key", "0F7").is_err());
/// ```
pub fn from_hex(source_name: &str, text: &str) -> CryptoResult<Vec<u8>> {
    hex::decode(text).map_err(|e| match e {
        hex::FromHexError::OddLength => CryptoError::format_error(
            source_name,
            "hex text must have an even number of characters",
            error_codes::HEX_ODD_LENGTH,
        ),
        hex::FromHexError::InvalidHexCharacter { index, .. } => CryptoError::format_error(
            source_name,
            &format!("invalid hex character at position {}", index),
            error_codes::HEX_INVALID_CHARACTER,
        ),
        other => CryptoError::format_error(
            source_name,
            &other.to_string(),
            error_codes::HEX_INVALID_CHARACTER,
        ),
    })
}
