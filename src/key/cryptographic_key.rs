use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::ZeroizeOnDrop;

use crate::error::CryptoResult;
use crate::utils;

/// Identifier of the default key.
///
/// Every alias that resolves to the default key yields a key carrying this
/// id, so a key ring never holds the default key twice. This includes
/// `default` and `WEBSITE_AUTH_ENCRYPTION_KEY`: a key requested under one of
/// those aliases reports the nil UUID as its id, not the alias, so key ids
/// recorded by other implementations as `default` will differ.
pub const DEFAULT_KEY_ID: &str = "00000000-0000-0000-0000-000000000000";

/// Textual alias for the default key.
pub const DEFAULT_KEY_ALIAS: &str = "default";

/// Size of keys produced by [`CryptographicKey::generate`] (256 bits)
pub const GENERATED_KEY_SIZE: usize = 32;

/// An identified piece of symmetric key material
///
/// The key bytes are never handed out mutably: [`value`](Self::value)
/// borrows them read-only and [`to_vec`](Self::to_vec) returns an
/// independent copy. The bytes are zeroed when the key is dropped.
///
/// # Examples
///
/// ```
/// use sitecrypt::key::CryptographicKey;
///
/// let key = CryptographicKey::from_hex("default", "0F75CA46E7EBDD39").unwrap();
/// assert_eq!(key.id(), "default");
/// assert_eq!(key.len(), 8);
/// ```
#[derive(Clone, ZeroizeOnDrop)]
pub struct CryptographicKey {
    id: String,
    value: Vec<u8>,
}

impl CryptographicKey {
    /// Create a key from raw bytes
    pub fn new(id: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            value: value.into(),
        }
    }

    /// Create a key from hex-encoded text
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::FormatError` if `hex_value` is not valid hex.
    pub fn from_hex(id: impl Into<String>, hex_value: &str) -> CryptoResult<Self> {
        let id = id.into();
        let value = utils::from_hex(&id, hex_value)?;
        Ok(Self { id, value })
    }

    /// Create a key with fresh random 256-bit key material
    pub fn generate(id: impl Into<String>) -> CryptoResult<Self> {
        let value = utils::random_bytes(GENERATED_KEY_SIZE)?;
        Ok(Self::new(id, value))
    }

    /// The key identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Read-only view of the key bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// An independent copy of the key bytes
    pub fn to_vec(&self) -> Vec<u8> {
        self.value.clone()
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Lowercase hex encoding of the key bytes
    pub fn to_hex(&self) -> String {
        utils::to_hex(&self.value)
    }

    /// Whether this key carries the default key id
    pub fn is_default(&self) -> bool {
        self.id.eq_ignore_ascii_case(DEFAULT_KEY_ID)
    }
}

impl PartialEq for CryptographicKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.value.len() == other.value.len()
            && bool::from(self.value.ct_eq(&other.value))
    }
}

impl Eq for CryptographicKey {}

impl fmt::Debug for CryptographicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CryptographicKey")
            .field("id", &self.id)
            .field("value", &format_args!("[REDACTED; {} bytes]", self.value.len()))
            .finish()
    }
}
