// Test vectors module for interoperability testing
// Known-answer vectors for the cipher and the key text format

pub mod aes_cbc;
pub mod key_text;
