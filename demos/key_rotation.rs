//! Key rotation walkthrough
//!
//! Shows how payloads written before a rotation stay readable after a new
//! key has been made current. Run with:
//!
//! ```text
//! cargo run --example key_rotation
//! ```

use sitecrypt::error::CryptoResult;
use sitecrypt::prelude::*;
use sitecrypt::source::{
    referenced_key_name, DEFAULT_KEY_ID_OVERRIDE, LOCAL_ENCRYPTION_KEY, PRIMARY_KEY_REFERENCE,
    SECONDARY_KEY_REFERENCE,
};
use sitecrypt::utils;

fn main() -> CryptoResult<()> {
    init()?;

    let original_key = CryptographicKey::generate("original")?;
    let source = MapSource::new().with(LOCAL_ENCRYPTION_KEY, original_key.to_hex());

    println!("=== Before rotation ===");
    let service = CryptoService::new(DefaultKeyResolver::new(source.clone()));
    let token = service.encrypt_str("session=42; role=editor", None)?;
    println!("Encrypted with key {}: {}", token.key_id(), token.value());
    print_ring(&service)?;

    println!("\n=== After rotation ===");
    let new_key_id = uuid::Uuid::new_v4().to_string();
    let new_key = utils::random_bytes(32)?;
    let rotated = source
        .with(referenced_key_name(&new_key_id), utils::to_hex(&new_key))
        .with(PRIMARY_KEY_REFERENCE, new_key_id.as_str())
        .with(SECONDARY_KEY_REFERENCE, sitecrypt::key::DEFAULT_KEY_ID)
        .with(DEFAULT_KEY_ID_OVERRIDE, new_key_id.as_str());
    let service = CryptoService::new(DefaultKeyResolver::new(rotated));
    print_ring(&service)?;

    let fresh = service.encrypt_str("session=43; role=viewer", None)?;
    println!("New payloads use key {}", fresh.key_id());

    let old = service.decrypt_str(token.value(), Some(token.key_id()))?;
    println!("Pre-rotation payload still decrypts: {}", old);

    Ok(())
}

fn print_ring<R: KeyResolver>(service: &CryptoService<R>) -> CryptoResult<()> {
    for (position, id) in service.resolver().all_keys()?.ids().iter().enumerate() {
        println!("  ring[{}] = {}", position, id);
    }
    Ok(())
}
