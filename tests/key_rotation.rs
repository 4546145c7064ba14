// End-to-end key rotation through the public API

use std::sync::Arc;

use sitecrypt::config::ResolverConfig;
use sitecrypt::export::KeyRingExporter;
use sitecrypt::key::DEFAULT_KEY_ID;
use sitecrypt::resolver::{DefaultKeyResolver, KeyResolver};
use sitecrypt::service::CryptoService;
use sitecrypt::source::{
    referenced_key_name, MapSource, DEFAULT_KEY_ID_OVERRIDE, PLATFORM_ENCRYPTION_KEY,
    PLATFORM_INSTANCE_ID, PLATFORM_SITE_NAME, PRIMARY_KEY_REFERENCE, SECONDARY_KEY_REFERENCE,
};
use sitecrypt::CryptoError;
use std::io::Write;

const SITE_KEY: &str = "5BC4B1A2F1D3E4C5B6A7980A1B2C3D4E5F60718293A4B5C6D7E8F90A1B2C3D4E";
const NEW_KEY_ID: &str = "ae67b5ee-aa29-44a4-85ac-fc7137cb44ce";
const NEW_KEY: &str = "A1B2C3D4E5F60718293A4B5C6D7E8F90A1B2C3D4E5F60718293A4B5C6D7E8F90";

fn platform_source() -> MapSource {
    MapSource::new()
        .with(PLATFORM_INSTANCE_ID, "7f3c9a")
        .with(PLATFORM_SITE_NAME, "contoso")
        .with(PLATFORM_ENCRYPTION_KEY, SITE_KEY)
}

fn isolated_config() -> ResolverConfig {
    ResolverConfig::default().without_machine_config()
}

#[test]
fn test_rotation_keeps_old_payloads_readable() {
    // Before rotation: payloads are written with the site key
    let before = CryptoService::new(DefaultKeyResolver::with_config(platform_source(), isolated_config()));
    let old_payload = before.encrypt_str("issued before rotation", None).unwrap();
    assert_eq!(old_payload.key_id(), DEFAULT_KEY_ID);

    // Rotation: a new key is introduced, referenced as primary and made current
    let rotated = platform_source()
        .with(referenced_key_name(NEW_KEY_ID), NEW_KEY)
        .with(PRIMARY_KEY_REFERENCE, NEW_KEY_ID)
        .with(SECONDARY_KEY_REFERENCE, DEFAULT_KEY_ID)
        .with(DEFAULT_KEY_ID_OVERRIDE, NEW_KEY_ID);
    let after = CryptoService::new(DefaultKeyResolver::with_config(rotated, isolated_config()));

    let new_payload = after.encrypt_str("issued after rotation", None).unwrap();
    assert_eq!(new_payload.key_id(), NEW_KEY_ID);

    // Both generations decrypt by their recorded key id
    assert_eq!(
        after.decrypt_str(old_payload.value(), Some(old_payload.key_id())).unwrap(),
        "issued before rotation"
    );
    assert_eq!(
        after.decrypt_str(new_payload.value(), Some(new_payload.key_id())).unwrap(),
        "issued after rotation"
    );

    // The ring lists the new key first, then the site key
    let ring = after.resolver().all_keys().unwrap();
    assert_eq!(ring.ids(), vec![NEW_KEY_ID, DEFAULT_KEY_ID]);
}

#[test]
fn test_retired_key_is_no_longer_resolvable() {
    let retired = platform_source().with(PRIMARY_KEY_REFERENCE, NEW_KEY_ID);
    let service = CryptoService::new(DefaultKeyResolver::with_config(retired, isolated_config()));

    match service.decrypt(&[0u8; 32], Some(NEW_KEY_ID)) {
        Err(CryptoError::KeyNotFound { key_id, .. }) => assert_eq!(key_id, NEW_KEY_ID),
        other => panic!("expected key not found, got {:?}", other),
    }

    // The unresolvable primary reference is skipped
    let ring = service.resolver().all_keys().unwrap();
    assert_eq!(ring.ids(), vec![DEFAULT_KEY_ID]);
}

#[test]
fn test_machine_config_serves_key_when_variable_missing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"<?xml version="1.0" encoding="utf-8"?>
<configuration>
  <location path="fabrikam">
    <system.web><machineKey decryptionKey="00112233445566778899AABBCCDDEEFF" /></system.web>
  </location>
  <location path="contoso">
    <system.web><machineKey decryptionKey="{}" validationKey="AutoGenerate" /></system.web>
  </location>
</configuration>"#,
        SITE_KEY
    )
    .unwrap();

    let source = MapSource::new()
        .with(PLATFORM_INSTANCE_ID, "7f3c9a")
        .with(PLATFORM_SITE_NAME, "contoso");
    let config = ResolverConfig::default().with_machine_config_path(file.path());
    let from_file = CryptoService::new(DefaultKeyResolver::with_config(source, config));

    // Same key as the platform variable would have provided
    let from_variable = CryptoService::new(DefaultKeyResolver::with_config(platform_source(), isolated_config()));
    let payload = from_variable.encrypt(b"cross-source", None).unwrap();
    assert_eq!(from_file.decrypt_result(&payload).unwrap(), b"cross-source");
}

#[test]
fn test_shared_resolver_across_threads() {
    let resolver = Arc::new(DefaultKeyResolver::with_config(platform_source(), isolated_config()));
    let service = CryptoService::new(Arc::clone(&resolver));
    let payload = service.encrypt(b"shared", None).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = CryptoService::new(Arc::clone(&resolver));
            let payload = payload.clone();
            std::thread::spawn(move || service.decrypt_result(&payload).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), b"shared");
    }
}

#[test]
fn test_export_after_rotation() {
    let rotated = platform_source()
        .with(referenced_key_name(NEW_KEY_ID), NEW_KEY)
        .with(PRIMARY_KEY_REFERENCE, NEW_KEY_ID);
    let resolver = DefaultKeyResolver::with_config(rotated, isolated_config());

    let exporter = KeyRingExporter::new();
    let elements = exporter.export_resolver(&resolver).unwrap();
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].id(), NEW_KEY_ID);
    assert!(elements[0].activation_date() > elements[1].activation_date());

    let xml = exporter.to_xml(&elements).unwrap();
    assert_eq!(xml.matches("<key ").count(), 2);
    assert!(xml.contains(&base64::encode(hex::decode(NEW_KEY).unwrap())));
}
