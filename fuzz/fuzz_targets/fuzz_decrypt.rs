#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sitecrypt::aes::{self, AesCbc, BLOCK_SIZE};

#[derive(Arbitrary, Debug)]
struct DecryptFuzzInput {
    key_size: u8,
    key_seed: u8,
    plaintext: Vec<u8>,
    framed: Vec<u8>,
    flip_at: Option<usize>,
}

fuzz_target!(|input: DecryptFuzzInput| {
    let key_len = [16, 24, 32][input.key_size as usize % 3];
    let key = vec![input.key_seed; key_len];
    let Ok(cipher) = AesCbc::new(&key) else {
        return;
    };

    // Arbitrary frames must be rejected or decrypted, never panic
    let _ = cipher.decrypt(&input.framed);
    let _ = aes::decrypt(&input.framed, &input.framed);

    // Round trip must always hold
    let framed = cipher.encrypt(&input.plaintext).expect("encryption with a valid key");
    assert!(framed.len() >= BLOCK_SIZE * 2);
    assert_eq!((framed.len() - BLOCK_SIZE) % BLOCK_SIZE, 0);
    let decrypted = cipher.decrypt(&framed).expect("decryption of own output");
    assert_eq!(decrypted, input.plaintext);

    // Tampered frames must not panic
    if let Some(position) = input.flip_at {
        let mut tampered = framed.clone();
        let index = position % tampered.len();
        tampered[index] ^= 0x01;
        let _ = cipher.decrypt(&tampered);
        let _ = cipher.decrypt(&tampered[..index]);
    }
});
