use once_cell::sync::OnceCell;
use uuid::Uuid;

use super::{is_default_key_id, machine_config, KeyResolver};
use crate::config::ResolverConfig;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{CryptographicKey, KeyRing, DEFAULT_KEY_ID};
use crate::source::{
    referenced_key_name, EnvironmentSource, KeySource, DEFAULT_KEY_ID_OVERRIDE,
    LOCAL_ENCRYPTION_KEY, PLATFORM_ENCRYPTION_KEY, PLATFORM_SITE_NAME, PRIMARY_KEY_REFERENCE,
    SECONDARY_KEY_REFERENCE,
};
use crate::utils;

/// Machine keys the platform fills in at runtime rather than storing.
const GENERATED_MACHINE_KEY_MARKERS: [&str; 2] = ["AutoGenerate", "IsolateApps"];

enum DefaultKeyInit {
    Unresolved,
    Failed(CryptoError),
}

/// Resolver for keys configured through the platform environment
///
/// The default key is computed at most once per resolver and shared by
/// all later calls; every other lookup re-reads the key source.
///
/// # Examples
///
/// ```
/// use sitecrypt::resolver::{DefaultKeyResolver, KeyResolver};
/// use sitecrypt::source::{MapSource, LOCAL_ENCRYPTION_KEY};
///
/// let source = MapSource::new().with(LOCAL_ENCRYPTION_KEY, "0F75CA46E7EBDD39E4CA6B074D1F9A59");
/// let resolver = DefaultKeyResolver::new(source);
///
/// let key = resolver.resolve_key(None).unwrap().unwrap();
/// assert_eq!(key.len(), 16);
/// assert_eq!(resolver.all_keys().unwrap().len(), 1);
/// ```
pub struct DefaultKeyResolver<S = EnvironmentSource> {
    source: S,
    config: ResolverConfig,
    default_key: OnceCell<CryptographicKey>,
}

impl DefaultKeyResolver<EnvironmentSource> {
    /// Resolver reading the process environment with the default configuration
    pub fn from_environment() -> Self {
        Self::new(EnvironmentSource)
    }
}

impl<S: KeySource> DefaultKeyResolver<S> {
    pub fn new(source: S) -> Self {
        Self::with_config(source, ResolverConfig::default())
    }

    pub fn with_config(source: S, config: ResolverConfig) -> Self {
        Self {
            source,
            config,
            default_key: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the default key
    ///
    /// A resolved key is memoized; concurrent first callers are serialized
    /// so the sources (including the machine configuration file) are read
    /// by one of them only. An unresolved key is not memoized.
    pub fn default_key(&self) -> CryptoResult<Option<CryptographicKey>> {
        let result = self
            .default_key
            .get_or_try_init(|| match self.load_default_key() {
                Ok(Some(key)) => Ok(key),
                Ok(None) => Err(DefaultKeyInit::Unresolved),
                Err(e) => Err(DefaultKeyInit::Failed(e)),
            });

        match result {
            Ok(key) => Ok(Some(key.clone())),
            Err(DefaultKeyInit::Unresolved) => Ok(None),
            Err(DefaultKeyInit::Failed(e)) => Err(e),
        }
    }

    fn load_default_key(&self) -> CryptoResult<Option<CryptographicKey>> {
        let Some((source_name, value)) = self.default_key_value()? else {
            log::debug!("No default encryption key configured");
            return Ok(None);
        };

        log::debug!("Default encryption key resolved from {}", source_name);
        let bytes = utils::from_hex(&source_name, &value)?;
        Ok(Some(CryptographicKey::new(DEFAULT_KEY_ID, bytes)))
    }

    fn default_key_value(&self) -> CryptoResult<Option<(String, String)>> {
        if !self.source.is_platform_environment() {
            return Ok(self
                .source
                .get_non_empty(LOCAL_ENCRYPTION_KEY)
                .map(|value| (LOCAL_ENCRYPTION_KEY.to_string(), value)));
        }

        if let Some(value) = self.source.get_non_empty(PLATFORM_ENCRYPTION_KEY) {
            return Ok(Some((PLATFORM_ENCRYPTION_KEY.to_string(), value)));
        }

        // The injected variable can lag behind process start; the machine
        // configuration file carries the same key.
        if !self.config.machine_config_enabled() {
            return Ok(None);
        }

        let path = self.config.machine_config_path();
        let site_name = self.source.get(PLATFORM_SITE_NAME).unwrap_or_default();
        let value = machine_config::read_machine_key(path, &site_name)?.filter(|value| {
            !value.is_empty()
                && !GENERATED_MACHINE_KEY_MARKERS
                    .iter()
                    .any(|marker| value.contains(marker))
        });

        Ok(value.map(|value| (path.display().to_string(), value)))
    }

    fn current_key(&self) -> CryptoResult<Option<CryptographicKey>> {
        match self.source.get_non_empty(DEFAULT_KEY_ID_OVERRIDE) {
            Some(key_id) => {
                log::debug!("Current key overridden by {}: {}", DEFAULT_KEY_ID_OVERRIDE, key_id);
                self.named_key(&key_id)
            }
            None => self.default_key(),
        }
    }

    fn named_key(&self, key_id: &str) -> CryptoResult<Option<CryptographicKey>> {
        if is_default_key_id(key_id) {
            return self.default_key();
        }

        let uuid = Uuid::parse_str(key_id.trim()).ok();
        if uuid.is_some_and(|uuid| uuid.is_nil()) {
            return self.default_key();
        }
        // UUID-shaped ids are reported in one canonical form whatever casing was asked for
        let canonical_id = uuid.map_or_else(|| key_id.to_string(), |uuid| uuid.to_string());

        if let Some(value) = self.source.get_non_empty(key_id) {
            let bytes = utils::from_hex(key_id, &value)?;
            return Ok(Some(CryptographicKey::new(canonical_id, bytes)));
        }

        if let Some(uuid) = uuid {
            if let Some((setting_name, value)) = self.referenced_value(key_id.trim(), &uuid) {
                let bytes = utils::from_hex(&setting_name, &value)?;
                return Ok(Some(CryptographicKey::new(canonical_id, bytes)));
            }
        }

        log::debug!("Key '{}' is not configured", key_id);
        Ok(None)
    }

    /// Resolve the key whose id is stored in the `reference` variable
    fn referenced_key(&self, reference: &str) -> CryptoResult<Option<CryptographicKey>> {
        let Some(raw_id) = self.source.get_non_empty(reference) else {
            return Ok(None);
        };

        let raw_id = raw_id.trim();
        let uuid = match Uuid::parse_str(raw_id) {
            Ok(uuid) => uuid,
            Err(_) => {
                log::debug!("Ignoring {}: value is not a key id", reference);
                return Ok(None);
            }
        };

        if uuid.is_nil() {
            return self.default_key();
        }

        match self.referenced_value(raw_id, &uuid) {
            Some((setting_name, value)) => {
                let bytes = utils::from_hex(&setting_name, &value)?;
                Ok(Some(CryptographicKey::new(uuid.to_string(), bytes)))
            }
            None => {
                log::debug!(
                    "{} names key {} but {} is not set",
                    reference,
                    raw_id,
                    referenced_key_name(raw_id)
                );
                Ok(None)
            }
        }
    }

    /// Look up the value of a referenced key
    ///
    /// Tries the setting named with the id as written, then the lowercase
    /// and uppercase hyphenated forms. Returns the setting name that matched
    /// together with its value.
    fn referenced_value(&self, written_id: &str, uuid: &Uuid) -> Option<(String, String)> {
        let lower = uuid.hyphenated().to_string();
        let upper = lower.to_ascii_uppercase();

        let mut candidates: Vec<&str> = Vec::with_capacity(3);
        for candidate in [written_id, lower.as_str(), upper.as_str()] {
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }

        candidates.into_iter().find_map(|candidate| {
            let setting_name = referenced_key_name(candidate);
            self.source
                .get_non_empty(&setting_name)
                .map(|value| (setting_name, value))
        })
    }
}

impl<S: KeySource> KeyResolver for DefaultKeyResolver<S> {
    fn resolve_key(&self, key_id: Option<&str>) -> CryptoResult<Option<CryptographicKey>> {
        match key_id {
            Some(key_id) if !key_id.is_empty() => self.named_key(key_id),
            _ => self.current_key(),
        }
    }

    fn all_keys(&self) -> CryptoResult<KeyRing> {
        let mut ring = KeyRing::new();

        for reference in [PRIMARY_KEY_REFERENCE, SECONDARY_KEY_REFERENCE] {
            if let Some(key) = self.referenced_key(reference)? {
                if !ring.push(key) {
                    log::debug!("{} duplicates a key already in the ring", reference);
                }
            }
        }

        // Without explicit rotation the default key is the primary; during
        // rotation with a single referenced key it is the fallback.
        if ring.len() < 2 {
            if let Some(key) = self.default_key()? {
                ring.push(key);
            }
        }

        log::debug!("Assembled key ring: {:?}", ring.ids());
        Ok(ring)
    }
}

impl<S> std::fmt::Debug for DefaultKeyResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultKeyResolver")
            .field("config", &self.config)
            .field("default_key_cached", &self.default_key.get().is_some())
            .finish()
    }
}
