/*!
 * Sitecrypt Key Resolution and Encryption
 *
 * This crate resolves symmetric key material for a hosted site from a
 * layered set of sources and encrypts payloads with it.
 *
 * The main pieces are:
 *
 * - Key resolution with a fixed precedence order and a memoized default key
 * - Key ring assembly for rotation (primary, secondary, default)
 * - AES-CBC encryption framed as `IV || ciphertext`
 * - Export of the key ring as host key-management XML
 *
 * Key sources are injected through the [`source::KeySource`] trait so the
 * resolver never depends on process-global state directly.
 */

/// AES-CBC implementation for symmetric encryption
pub mod aes;

/// Resolver configuration
pub mod config;

/// Common error types for key resolution and encryption
pub mod error;

/// Key ring export to host key-management XML
pub mod export;

/// Key value objects and the rotation key ring
pub mod key;

/// Key resolution from layered sources
pub mod resolver;

/// Encryption service bound to a key resolver
pub mod service;

/// Named value sources and well-known variable names
pub mod source;

/// Utilities for hex text and random bytes
pub mod utils;

// Re-export main types for convenience
pub use config::ResolverConfig;
pub use error::{CryptoError, CryptoResult};
pub use export::{KeyElement, KeyRingExporter};
pub use key::{CryptographicKey, KeyRing};
pub use resolver::{DefaultKeyResolver, KeyResolver, StaticKeyResolver};
pub use service::{CryptoService, EncryptionResult};
pub use source::{EnvironmentSource, KeySource, MapSource};

/// Initialize the library.
///
/// Checks that the operating system random source is usable, since every
/// encryption draws a fresh IV from it.
///
/// # Returns
///
/// `Ok(())` if initialization is successful, or an error if the random
/// source is unavailable
///
/// # Example
///
/// ```
/// use sitecrypt::prelude::*;
///
/// fn main() -> Result<(), CryptoError> {
///     init()?;
///
///     let service = CryptoService::new(StaticKeyResolver::generate()?);
///     let encrypted = service.encrypt(b"hello", None)?;
///     assert_eq!(service.decrypt_result(&encrypted)?, b"hello");
///
///     Ok(())
/// }
/// ```
pub fn init() -> Result<(), CryptoError> {
    utils::random_bytes(aes::BLOCK_SIZE)?;
    log::debug!("Operating system random source available");
    Ok(())
}

/// Service over the process environment with the default configuration
///
/// Each call builds a fresh resolver; hold on to the returned service to
/// benefit from default-key memoization.
pub fn environment_service() -> CryptoService<DefaultKeyResolver> {
    CryptoService::new(DefaultKeyResolver::from_environment())
}

/// Provides the most commonly used types and functions.
pub mod prelude {
    pub use crate::environment_service;
    pub use crate::init;
    pub use crate::CryptoError;
    pub use crate::CryptoResult;
    pub use crate::CryptoService;
    pub use crate::CryptographicKey;
    pub use crate::DefaultKeyResolver;
    pub use crate::EncryptionResult;
    pub use crate::EnvironmentSource;
    pub use crate::KeyElement;
    pub use crate::KeyResolver;
    pub use crate::KeyRing;
    pub use crate::KeyRingExporter;
    pub use crate::KeySource;
    pub use crate::MapSource;
    pub use crate::ResolverConfig;
    pub use crate::StaticKeyResolver;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialization() {
        assert!(init().is_ok());
    }

    #[test]
    fn test_prelude_round_trip() {
        use prelude::*;

        init().unwrap();

        let source = MapSource::new().with(
            source::LOCAL_ENCRYPTION_KEY,
            "0F75CA46E7EBDD39E4CA6B074D1F9A5972B849A55F91A2488B2F3C1D9E0A5B7C",
        );
        let service = CryptoService::new(DefaultKeyResolver::new(source));

        let encrypted = service.encrypt_str("prelude message", None).unwrap();
        assert_eq!(encrypted.key_id(), key::DEFAULT_KEY_ID);

        let decrypted = service
            .decrypt_str(encrypted.value(), Some("default"))
            .unwrap();
        assert_eq!(decrypted, "prelude message");
    }

    #[test]
    fn test_types_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}

        assert_send_sync::<CryptographicKey>();
        assert_send_sync::<KeyRing>();
        assert_send_sync::<DefaultKeyResolver<MapSource>>();
        assert_send_sync::<StaticKeyResolver>();
        assert_send_sync::<CryptoService<DefaultKeyResolver<MapSource>>>();
        assert_send_sync::<KeyRingExporter>();
    }
}
