use serde::{Deserialize, Serialize};

use crate::aes::AesCbc;
use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::key::CryptographicKey;
use crate::resolver::KeyResolver;

/// Output of an encryption together with the id of the key that produced it
///
/// Keeping the id alongside the payload lets the caller decrypt with the
/// same key after the current key has rotated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptionResult<T> {
    key_id: String,
    value: T,
}

impl<T> EncryptionResult<T> {
    pub fn new(key_id: impl Into<String>, value: T) -> Self {
        Self {
            key_id: key_id.into(),
            value,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (String, T) {
        (self.key_id, self.value)
    }
}

/// Symmetric encryption with resolver-managed keys
///
/// # Examples
///
/// ```
/// use sitecrypt::resolver::StaticKeyResolver;
/// use sitecrypt::service::CryptoService;
///
/// let resolver = StaticKeyResolver::new(vec![0x24; 32]);
/// let service = CryptoService::new(resolver);
///
/// let encrypted = service.encrypt_str("hello", None).unwrap();
/// let decrypted = service.decrypt_str(encrypted.value(), Some(encrypted.key_id())).unwrap();
/// assert_eq!(decrypted, "hello");
/// ```
#[derive(Debug, Clone)]
pub struct CryptoService<R> {
    resolver: R,
}

impl<R: KeyResolver> CryptoService<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Encrypt `plaintext` with the key named by `key_id`, or the current key
    ///
    /// # Arguments
    ///
    /// * `plaintext` - Data to encrypt
    /// * `key_id` - Key to use; `None` selects the current key
    ///
    /// # Returns
    ///
    /// The `IV || ciphertext` frame and the id of the key used
    ///
    /// # Errors
    ///
    /// * `CryptoError::KeyNotFound` if no key resolves
    /// * `CryptoError::InvalidParameter` if the key is not 16, 24 or 32 bytes
    pub fn encrypt(
        &self,
        plaintext: &[u8],
        key_id: Option<&str>,
    ) -> CryptoResult<EncryptionResult<Vec<u8>>> {
        let key = self.resolver.require_key(key_id)?;
        let framed = cipher_for(&key)?.encrypt(plaintext)?;
        Ok(EncryptionResult::new(key.id(), framed))
    }

    /// Decrypt an `IV || ciphertext` frame with the key named by `key_id`
    ///
    /// # Errors
    ///
    /// * `CryptoError::KeyNotFound` if no key resolves
    /// * `CryptoError::DecryptionError` if the frame is truncated or the
    ///   padding does not verify
    pub fn decrypt(&self, framed: &[u8], key_id: Option<&str>) -> CryptoResult<Vec<u8>> {
        let key = self.resolver.require_key(key_id)?;
        cipher_for(&key)?.decrypt(framed)
    }

    /// Decrypt a result produced by [`encrypt`](Self::encrypt) with the key it records
    pub fn decrypt_result(&self, result: &EncryptionResult<Vec<u8>>) -> CryptoResult<Vec<u8>> {
        self.decrypt(result.value(), Some(result.key_id()))
    }

    /// Encrypt UTF-8 text, returning the frame as standard base64
    pub fn encrypt_str(
        &self,
        plaintext: &str,
        key_id: Option<&str>,
    ) -> CryptoResult<EncryptionResult<String>> {
        let (key_id, framed) = self.encrypt(plaintext.as_bytes(), key_id)?.into_parts();
        Ok(EncryptionResult::new(key_id, base64::encode(framed)))
    }

    /// Decrypt base64 text produced by [`encrypt_str`](Self::encrypt_str)
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::DecryptionError` if `encoded` is not valid
    /// base64 or the recovered plaintext is not UTF-8, in addition to the
    /// errors of [`decrypt`](Self::decrypt).
    pub fn decrypt_str(&self, encoded: &str, key_id: Option<&str>) -> CryptoResult<String> {
        let framed = base64::decode(encoded.trim()).map_err(|e| {
            CryptoError::decryption_error(
                &format!("payload is not valid base64: {}", e),
                error_codes::PAYLOAD_ENCODING_INVALID,
            )
        })?;

        let plaintext = self.decrypt(&framed, key_id)?;
        String::from_utf8(plaintext).map_err(|_| {
            CryptoError::decryption_error(
                "decrypted payload is not valid UTF-8",
                error_codes::PAYLOAD_ENCODING_INVALID,
            )
        })
    }
}

fn cipher_for(key: &CryptographicKey) -> CryptoResult<AesCbc> {
    AesCbc::new(key.value()).map_err(|e| {
        log::warn!("Key '{}' cannot be used with AES: {}", key.id(), e);
        e
    })
}
