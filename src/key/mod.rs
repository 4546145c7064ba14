/*!
 * Key material value objects
 *
 * This module defines the immutable `CryptographicKey` and the ordered,
 * deduplicated `KeyRing` produced by key resolution.
 */

mod cryptographic_key;
mod key_ring;

pub use cryptographic_key::*;
pub use key_ring::*;

#[cfg(test)]
mod tests;
