/*!
 * AES-CBC implementation for symmetric encryption
 *
 * This module implements AES in CBC mode with PKCS#7 padding, framed as
 * `IV || ciphertext`. The key length selects AES-128, AES-192 or AES-256.
 */

mod aes;

pub use self::aes::*;
