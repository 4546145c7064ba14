// Resolution against the live process environment
//
// Kept in its own test binary: it mutates process-wide variables.

use sitecrypt::prelude::*;
use sitecrypt::source::{referenced_key_name, LOCAL_ENCRYPTION_KEY, PRIMARY_KEY_REFERENCE};

#[test]
fn test_environment_resolution() {
    let key_id = "3d2b7c1e-8f4a-4b6d-9e0f-1a2b3c4d5e6f";

    std::env::set_var(LOCAL_ENCRYPTION_KEY, "0F75CA46E7EBDD39E4CA6B074D1F9A59");
    std::env::set_var(PRIMARY_KEY_REFERENCE, key_id);
    std::env::set_var(referenced_key_name(key_id), "00112233445566778899AABBCCDDEEFF");

    let service = environment_service();
    if service.resolver().source().is_platform_environment() {
        // Running on the managed platform itself; local keys do not apply
        return;
    }

    let ring = service.resolver().all_keys().unwrap();
    assert_eq!(ring.ids(), vec![key_id, sitecrypt::key::DEFAULT_KEY_ID]);

    let encrypted = service.encrypt_str("from the environment", Some(key_id)).unwrap();
    assert_eq!(
        service.decrypt_str(encrypted.value(), Some(key_id)).unwrap(),
        "from the environment"
    );

    // Later changes to non-default variables are seen without a new resolver
    std::env::remove_var(referenced_key_name(key_id));
    assert!(service.resolver().resolve_key(Some(key_id)).unwrap().is_none());

    std::env::remove_var(LOCAL_ENCRYPTION_KEY);
    std::env::remove_var(PRIMARY_KEY_REFERENCE);
}
