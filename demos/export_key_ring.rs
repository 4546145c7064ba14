//! Export the key ring as host key-management XML
//!
//! Reads keys from the process environment and prints the repository
//! document. The output contains key material; redirect it only to
//! protected storage.
//!
//! ```text
//! AzureWebEncryptionKey=0F75CA46E7EBDD39E4CA6B074D1F9A59 cargo run --example export_key_ring
//! ```

use sitecrypt::error::CryptoResult;
use sitecrypt::prelude::*;

fn main() -> CryptoResult<()> {
    init()?;

    let resolver = DefaultKeyResolver::from_environment();
    let exporter = KeyRingExporter::new();

    let elements = exporter.export_resolver(&resolver)?;
    if elements.is_empty() {
        eprintln!("No keys configured; set AzureWebEncryptionKey to a hex key");
        return Ok(());
    }

    for element in &elements {
        eprintln!(
            "key {} active from {} until {}",
            element.id(),
            element.activation_date(),
            element.expiration_date()
        );
    }

    println!("{}", exporter.to_xml(&elements)?);
    Ok(())
}
