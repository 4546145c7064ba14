/*!
 * Resolver configuration
 */

use std::path::{Path, PathBuf};

/// Location of the platform's machine-level configuration file
pub const DEFAULT_MACHINE_CONFIG_PATH: &str = r"D:\local\config\rootweb.config";

/// Configuration for [`DefaultKeyResolver`](crate::resolver::DefaultKeyResolver)
///
/// # Examples
///
/// ```
/// use sitecrypt::config::ResolverConfig;
///
/// let config = ResolverConfig::default().with_machine_config_path("/etc/site/rootweb.config");
/// assert!(config.machine_config_path().ends_with("rootweb.config"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    machine_config_path: PathBuf,
    machine_config_enabled: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            machine_config_path: PathBuf::from(DEFAULT_MACHINE_CONFIG_PATH),
            machine_config_enabled: true,
        }
    }
}

impl ResolverConfig {
    /// Use a different machine configuration file
    pub fn with_machine_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.machine_config_path = path.into();
        self
    }

    /// Never consult the machine configuration file
    pub fn without_machine_config(mut self) -> Self {
        self.machine_config_enabled = false;
        self
    }

    pub fn machine_config_path(&self) -> &Path {
        &self.machine_config_path
    }

    pub fn machine_config_enabled(&self) -> bool {
        self.machine_config_enabled
    }
}
