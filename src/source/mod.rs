/*!
 * Key source adapters
 *
 * A key source is a read-only snapshot of named string values (usually the
 * process environment). Resolvers receive their source at construction so
 * that resolution can be exercised without touching global process state.
 */

use std::collections::HashMap;
use std::sync::Arc;

/// Presence indicates the process runs under the managed platform.
pub const PLATFORM_INSTANCE_ID: &str = "WEBSITE_INSTANCE_ID";

/// Site name used to scope the machine configuration lookup.
pub const PLATFORM_SITE_NAME: &str = "WEBSITE_SITE_NAME";

/// Platform-injected default key (hex).
pub const PLATFORM_ENCRYPTION_KEY: &str = "WEBSITE_AUTH_ENCRYPTION_KEY";

/// Default key (hex) outside the managed platform.
pub const LOCAL_ENCRYPTION_KEY: &str = "AzureWebEncryptionKey";

/// Id of the key to treat as current when none is requested.
pub const DEFAULT_KEY_ID_OVERRIDE: &str = "AzureWebDefaultEncryptionKeyId";

/// Id of the primary rotation key.
pub const PRIMARY_KEY_REFERENCE: &str = "AzureWebPrimaryEncryptionKeyId";

/// Id of the secondary rotation key.
pub const SECONDARY_KEY_REFERENCE: &str = "AzureWebSecondaryEncryptionKeyId";

/// Prefix of the variable holding the hex value of a referenced key id.
pub const REFERENCED_KEY_PREFIX: &str = "AzureWebEncryptionKey_";

/// Name of the variable holding the value of a referenced key
pub fn referenced_key_name(key_id: &str) -> String {
    format!("{}{}", REFERENCED_KEY_PREFIX, key_id)
}

/// A source of named configuration values
///
/// Implementations must be pure lookups. Empty values are reported as
/// absent by [`get_non_empty`](KeySource::get_non_empty), which is what the
/// resolvers use.
pub trait KeySource: Send + Sync {
    /// Look up a named value
    fn get(&self, name: &str) -> Option<String>;

    /// Look up a named value, treating an empty string as absent
    fn get_non_empty(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// Whether the process runs under the managed platform
    fn is_platform_environment(&self) -> bool {
        self.get_non_empty(PLATFORM_INSTANCE_ID).is_some()
    }
}

impl<T: KeySource + ?Sized> KeySource for &T {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

impl<T: KeySource + ?Sized> KeySource for Arc<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

impl<T: KeySource + ?Sized> KeySource for Box<T> {
    fn get(&self, name: &str) -> Option<String> {
        (**self).get(name)
    }
}

/// Key source backed by the process environment
///
/// Every lookup reads the live environment; nothing is cached here.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentSource;

impl KeySource for EnvironmentSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// In-memory key source
///
/// # Examples
///
/// ```
/// use sitecrypt::source::{KeySource, MapSource, LOCAL_ENCRYPTION_KEY};
///
/// let source = MapSource::new().with(LOCAL_ENCRYPTION_KEY, "0F75CA46");
/// assert_eq!(source.get(LOCAL_ENCRYPTION_KEY).as_deref(), Some("0F75CA46"));
/// assert!(!source.is_platform_environment());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

impl KeySource for MapSource {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapSource {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut source = MapSource::new();
        for (name, value) in iter {
            source.insert(name, value);
        }
        source
    }
}
