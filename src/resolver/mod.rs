/*!
 * Key resolution
 *
 * This module decides which key material is "current", which key a given
 * identifier refers to, and which keys make up the rotation key ring.
 *
 * Resolution order for the default key:
 *
 * 1. Platform environment: the platform-injected key variable
 * 2. Platform environment: the machine configuration file, scoped to the site
 * 3. Elsewhere: the local development key variable
 */

mod default_resolver;
pub mod machine_config;
mod static_resolver;

pub use default_resolver::DefaultKeyResolver;
pub use static_resolver::StaticKeyResolver;

use std::sync::Arc;

use crate::error::{CryptoError, CryptoResult};
use crate::key::{CryptographicKey, KeyRing, DEFAULT_KEY_ALIAS, DEFAULT_KEY_ID};
use crate::source::PLATFORM_ENCRYPTION_KEY;

/// Identifiers that resolve to the default key
pub const DEFAULT_KEY_ALIASES: [&str; 3] = [DEFAULT_KEY_ALIAS, PLATFORM_ENCRYPTION_KEY, DEFAULT_KEY_ID];

/// Whether `key_id` is one of the default key aliases (ASCII case-insensitive)
pub fn is_default_key_id(key_id: &str) -> bool {
    DEFAULT_KEY_ALIASES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(key_id))
}

/// Resolves identifiers to key material
///
/// A key that is not configured is reported as `Ok(None)`; errors are
/// reserved for misconfiguration such as malformed hex text.
pub trait KeyResolver: Send + Sync {
    /// Resolve a key by id, or the current key when `key_id` is `None` or empty
    fn resolve_key(&self, key_id: Option<&str>) -> CryptoResult<Option<CryptographicKey>>;

    /// Assemble the ordered, deduplicated key ring
    fn all_keys(&self) -> CryptoResult<KeyRing>;

    /// Resolve a key, failing with `CryptoError::KeyNotFound` if it is not configured
    fn require_key(&self, key_id: Option<&str>) -> CryptoResult<CryptographicKey> {
        self.resolve_key(key_id)?
            .ok_or_else(|| CryptoError::key_not_found(key_id.filter(|id| !id.is_empty())))
    }
}

impl<T: KeyResolver + ?Sized> KeyResolver for &T {
    fn resolve_key(&self, key_id: Option<&str>) -> CryptoResult<Option<CryptographicKey>> {
        (**self).resolve_key(key_id)
    }

    fn all_keys(&self) -> CryptoResult<KeyRing> {
        (**self).all_keys()
    }
}

impl<T: KeyResolver + ?Sized> KeyResolver for Arc<T> {
    fn resolve_key(&self, key_id: Option<&str>) -> CryptoResult<Option<CryptographicKey>> {
        (**self).resolve_key(key_id)
    }

    fn all_keys(&self) -> CryptoResult<KeyRing> {
        (**self).all_keys()
    }
}

impl<T: KeyResolver + ?Sized> KeyResolver for Box<T> {
    fn resolve_key(&self, key_id: Option<&str>) -> CryptoResult<Option<CryptographicKey>> {
        (**self).resolve_key(key_id)
    }

    fn all_keys(&self) -> CryptoResult<KeyRing> {
        (**self).all_keys()
    }
}
