use sitecrypt::error::{CryptoError, CryptoResult};
use sitecrypt::prelude::*;

/// Diagnostic run against the process environment.
///
/// Prints the resolved key ring ids (never key values) and performs an
/// encrypt/decrypt round trip with every key in the ring.
fn main() -> CryptoResult<()> {
    println!("Checking site key configuration...");

    init()?;

    let resolver = DefaultKeyResolver::from_environment();
    println!(
        "Platform environment: {}",
        if resolver.source().is_platform_environment() { "yes" } else { "no" }
    );

    report_key_ring(&resolver)?;
    self_test(&resolver)?;

    Ok(())
}

fn report_key_ring(resolver: &DefaultKeyResolver) -> CryptoResult<()> {
    println!("\n=== Key ring ===");

    let ring = resolver.all_keys()?;
    if ring.is_empty() {
        println!("No keys configured");
        return Ok(());
    }

    for (position, key) in ring.iter().enumerate() {
        let role = if position == 0 { "primary" } else { "fallback" };
        println!("{}: {} ({} bytes, {})", position, key.id(), key.len(), role);
    }

    match resolver.resolve_key(None)? {
        Some(current) => println!("Current key: {}", current.id()),
        None => println!("Current key: not configured"),
    }

    Ok(())
}

fn self_test(resolver: &DefaultKeyResolver) -> CryptoResult<()> {
    println!("\n=== Self-test ===");

    let service = CryptoService::new(resolver);
    let ring = resolver.all_keys()?;
    let message = "sitecrypt self-test";

    for key in &ring {
        let encrypted = service.encrypt_str(message, Some(key.id()))?;
        let decrypted = service.decrypt_str(encrypted.value(), Some(encrypted.key_id()))?;

        if decrypted != message {
            println!("✗ Round trip with key {} FAILED", key.id());
            return Err(CryptoError::decryption_error(
                &format!("self-test round trip mismatch for key {}", key.id()),
                sitecrypt::error::error_codes::AES_DECRYPTION_FAILED,
            ));
        }
        println!("✓ Round trip with key {} passed", key.id());
    }

    println!("=== Self-test completed ===");
    Ok(())
}
