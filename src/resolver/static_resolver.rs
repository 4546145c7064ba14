use super::{is_default_key_id, KeyResolver};
use crate::error::CryptoResult;
use crate::key::{CryptographicKey, KeyRing, DEFAULT_KEY_ID};
use crate::utils;

/// Resolver holding one fixed key under the default id
///
/// Intended for local development and tests where no platform environment
/// exists. Only the current key and the default aliases resolve.
#[derive(Debug, Clone)]
pub struct StaticKeyResolver {
    key: CryptographicKey,
}

impl StaticKeyResolver {
    pub fn new(value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: CryptographicKey::new(DEFAULT_KEY_ID, value),
        }
    }

    /// Build from hex-encoded key text
    pub fn from_hex(hex_value: &str) -> CryptoResult<Self> {
        let value = utils::from_hex("static key", hex_value)?;
        Ok(Self::new(value))
    }

    /// Build with a fresh random 256-bit key
    pub fn generate() -> CryptoResult<Self> {
        Ok(Self {
            key: CryptographicKey::generate(DEFAULT_KEY_ID)?,
        })
    }

    pub fn key(&self) -> &CryptographicKey {
        &self.key
    }
}

impl KeyResolver for StaticKeyResolver {
    fn resolve_key(&self, key_id: Option<&str>) -> CryptoResult<Option<CryptographicKey>> {
        match key_id {
            Some(key_id) if !key_id.is_empty() && !is_default_key_id(key_id) => Ok(None),
            _ => Ok(Some(self.key.clone())),
        }
    }

    fn all_keys(&self) -> CryptoResult<KeyRing> {
        Ok(std::iter::once(self.key.clone()).collect())
    }
}
