//! Layered configuration for default cache locations.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use color_eyre::eyre::eyre;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::env::EnvStore;
use crate::error::{ConfigError, ConfigResult};
use crate::location::CentralLocation;

/// Captures cache settings supplied via environment variables or
/// configuration files.
///
/// # Examples
/// ```
/// use artifact_cache::CacheEnvCfg;
///
/// let cfg = CacheEnvCfg::default();
/// assert!(cfg.central_location.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, OrthoConfig, Default)]
#[ortho_config(prefix = "ARTIFACT_CACHE")]
pub struct CacheEnvCfg {
    /// Root directory every default cache path is nested under.
    pub central_location: Option<Utf8PathBuf>,
    /// Whether enabling a cache creates its directory. Defaults to `true`.
    pub initialize_if_missing: Option<bool>,
}

impl CacheEnvCfg {
    /// Loads configuration without parsing CLI arguments.
    ///
    /// # Errors
    /// Returns an error when a configuration source cannot be parsed.
    pub fn load() -> ConfigResult<Self> {
        let args = [OsString::from("artifact-cache")];
        Self::load_from_iter(args).map_err(|err| ConfigError::from(eyre!(err)))
    }

    /// Builds a [`CentralLocation`] over `store` from these settings.
    ///
    /// Without a configured root, or with one that is blank after trimming,
    /// the location keeps resolving the root from the store at call time.
    #[must_use]
    pub fn to_location(&self, store: Arc<dyn EnvStore>) -> CentralLocation {
        let mut location = CentralLocation::with_store(store)
            .initialize_if_missing(self.initialize_if_missing.unwrap_or(true));
        let root = self
            .central_location
            .as_ref()
            .map(|root| root.as_str().trim())
            .filter(|root| !root.is_empty());
        if let Some(root) = root {
            location = location.with_root(root);
        }
        location
    }

    /// Applies command-line overrides on top of loaded values.
    #[must_use]
    pub fn with_overrides(
        mut self,
        central_location: Option<Utf8PathBuf>,
        no_create: bool,
    ) -> Self {
        if central_location.is_some() {
            self.central_location = central_location;
        }
        if no_create {
            self.initialize_if_missing = Some(false);
        }
        self
    }
}
