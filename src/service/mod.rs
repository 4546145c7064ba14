/*!
 * Encryption service
 *
 * Binds a key resolver to the AES-CBC cipher. Callers encrypt and decrypt
 * by key id; the service resolves the key material for every call so a
 * rotated key takes effect without rebuilding the service.
 */

mod crypto_service;

pub use crypto_service::*;
