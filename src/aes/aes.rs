use aes::{Aes128, Aes192, Aes256};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use zeroize::Zeroizing;

use crate::error::{error_codes, CryptoError, CryptoResult};
use crate::utils;

/// AES block size in bytes; also the IV length
pub const BLOCK_SIZE: usize = 16;

/// AES variant, selected by key length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl AesKeySize {
    /// Pick the variant for a key of `len` bytes
    pub fn from_key_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(AesKeySize::Aes128),
            24 => Some(AesKeySize::Aes192),
            32 => Some(AesKeySize::Aes256),
            _ => None,
        }
    }

    /// Key length in bytes
    pub fn key_len(&self) -> usize {
        match self {
            AesKeySize::Aes128 => 16,
            AesKeySize::Aes192 => 24,
            AesKeySize::Aes256 => 32,
        }
    }
}

/// AES-CBC cipher with PKCS#7 padding
///
/// Encryption output is `IV || ciphertext` with a fresh random IV per call.
/// This layout carries no authentication tag; a wrong key is detected
/// through padding failure or produces unrelated bytes.
///
/// # Examples
///
/// ```
/// use sitecrypt::aes::{AesCbc, BLOCK_SIZE};
///
/// let cipher = AesCbc::new(&[0x42; 32]).unwrap();
///
/// let framed = cipher.encrypt(b"Secret message").unwrap();
/// assert_eq!(framed.len(), BLOCK_SIZE * 2);
///
/// let decrypted = cipher.decrypt(&framed).unwrap();
/// assert_eq!(decrypted, b"Secret message");
/// ```
#[derive(Clone)]
pub struct AesCbc {
    key: Zeroizing<Vec<u8>>,
    key_size: AesKeySize,
}

impl std::fmt::Debug for AesCbc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AesCbc")
            .field("key_size", &self.key_size)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl AesCbc {
    /// Create a new AES-CBC cipher with the given key
    ///
    /// # Arguments
    ///
    /// * `key` - 16, 24 or 32 bytes of key material
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidParameter` for any other key length
    pub fn new(key: &[u8]) -> CryptoResult<Self> {
        let key_size = AesKeySize::from_key_len(key.len()).ok_or_else(|| CryptoError::InvalidParameter {
            parameter: "key".to_string(),
            expected: "16, 24 or 32 bytes".to_string(),
            actual: format!("{} bytes", key.len()),
            error_code: error_codes::AES_INVALID_KEY_SIZE,
        })?;

        Ok(Self {
            key: Zeroizing::new(key.to_vec()),
            key_size,
        })
    }

    pub fn key_size(&self) -> AesKeySize {
        self.key_size
    }

    /// Generate a random IV from the OS random source
    pub fn generate_iv() -> CryptoResult<[u8; BLOCK_SIZE]> {
        let bytes = utils::random_bytes(BLOCK_SIZE)?;
        let mut iv = [0u8; BLOCK_SIZE];
        iv.copy_from_slice(&bytes);
        Ok(iv)
    }

    /// Encrypt `plaintext` under a fresh IV
    ///
    /// # Returns
    ///
    /// `IV || ciphertext`; the ciphertext is the padded plaintext length,
    /// so the output is always at least two blocks long.
    pub fn encrypt(&self, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
        let iv = Self::generate_iv()?;
        let ciphertext = self.encrypt_with_iv(plaintext, &iv)?;

        let mut framed = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
        framed.extend_from_slice(&iv);
        framed.extend_from_slice(&ciphertext);
        Ok(framed)
    }

    /// Encrypt `plaintext` with an explicit IV, returning the ciphertext only
    ///
    /// Reusing an IV with the same key leaks equality of plaintext prefixes;
    /// [`encrypt`](Self::encrypt) should be preferred.
    pub fn encrypt_with_iv(&self, plaintext: &[u8], iv: &[u8]) -> CryptoResult<Vec<u8>> {
        check_iv(iv)?;
        let key: &[u8] = &self.key;

        let ciphertext = match self.key_size {
            AesKeySize::Aes128 => cbc::Encryptor::<Aes128>::new_from_slices(key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            AesKeySize::Aes192 => cbc::Encryptor::<Aes192>::new_from_slices(key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
            AesKeySize::Aes256 => cbc::Encryptor::<Aes256>::new_from_slices(key, iv)
                .map(|c| c.encrypt_padded_vec_mut::<Pkcs7>(plaintext)),
        };

        ciphertext.map_err(|e| {
            CryptoError::encryption_error(
                &format!("AES-CBC initialization failed: {}", e),
                error_codes::AES_ENCRYPTION_FAILED,
            )
        })
    }

    /// Decrypt an `IV || ciphertext` frame
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::DecryptionError` if:
    /// * The input is shorter than one block (no IV)
    /// * The ciphertext is empty or not a whole number of blocks
    /// * The padding is invalid, which usually means the wrong key
    pub fn decrypt(&self, framed: &[u8]) -> CryptoResult<Vec<u8>> {
        if framed.len() < BLOCK_SIZE {
            return Err(CryptoError::decryption_error(
                &format!("input of {} bytes is shorter than the IV", framed.len()),
                error_codes::AES_TRUNCATED_CIPHERTEXT,
            ));
        }

        let (iv, ciphertext) = framed.split_at(BLOCK_SIZE);
        self.decrypt_with_iv(ciphertext, iv)
    }

    /// Decrypt a ciphertext produced with an explicit IV
    pub fn decrypt_with_iv(&self, ciphertext: &[u8], iv: &[u8]) -> CryptoResult<Vec<u8>> {
        check_iv(iv)?;
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return Err(CryptoError::decryption_error(
                &format!(
                    "ciphertext length {} is not a positive multiple of {}",
                    ciphertext.len(),
                    BLOCK_SIZE
                ),
                error_codes::AES_TRUNCATED_CIPHERTEXT,
            ));
        }

        let key: &[u8] = &self.key;
        let plaintext = match self.key_size {
            AesKeySize::Aes128 => cbc::Decryptor::<Aes128>::new_from_slices(key, iv)
                .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
            AesKeySize::Aes192 => cbc::Decryptor::<Aes192>::new_from_slices(key, iv)
                .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
            AesKeySize::Aes256 => cbc::Decryptor::<Aes256>::new_from_slices(key, iv)
                .map(|c| c.decrypt_padded_vec_mut::<Pkcs7>(ciphertext)),
        };

        match plaintext {
            Ok(Ok(plaintext)) => Ok(plaintext),
            Ok(Err(_)) => Err(CryptoError::decryption_error(
                "invalid padding; the data was not encrypted with this key",
                error_codes::AES_PADDING_INVALID,
            )),
            Err(e) => Err(CryptoError::decryption_error(
                &format!("AES-CBC initialization failed: {}", e),
                error_codes::AES_DECRYPTION_FAILED,
            )),
        }
    }
}

fn check_iv(iv: &[u8]) -> CryptoResult<()> {
    if iv.len() != BLOCK_SIZE {
        return Err(CryptoError::InvalidParameter {
            parameter: "iv".to_string(),
            expected: format!("{} bytes", BLOCK_SIZE),
            actual: format!("{} bytes", iv.len()),
            error_code: error_codes::AES_INVALID_IV_SIZE,
        });
    }
    Ok(())
}

/// Encrypt `plaintext` with `key`, returning `IV || ciphertext`
pub fn encrypt(plaintext: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
    AesCbc::new(key)?.encrypt(plaintext)
}

/// Decrypt an `IV || ciphertext` frame with `key`
pub fn decrypt(framed: &[u8], key: &[u8]) -> CryptoResult<Vec<u8>> {
    AesCbc::new(key)?.decrypt(framed)
}
