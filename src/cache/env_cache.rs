//! Cache switched through a single environment variable.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use super::{PathCache, PathHolder, SwitchableCache};
use crate::env::{EnvStore, process_env};
use crate::error::{DirectoryError, Result};
use crate::fs::{ensure_dir_exists, is_within};
use crate::location::install_root;
use crate::observability::LOG_TARGET;

/// A cache published by writing its path into one environment variable.
///
/// The variable's value at construction time is remembered and restored by
/// [`disable`](SwitchableCache::disable). Later enable/disable cycles always
/// fall back to that first observed value, not to whatever was present right
/// before the most recent enable.
pub struct EnvSwitchableCache {
    variable: String,
    path: PathHolder,
    original_value: Option<OsString>,
    initialize_if_missing: bool,
    install_root: Option<Utf8PathBuf>,
    store: Arc<dyn EnvStore>,
}

/// Configures an [`EnvSwitchableCache`] before its original value is captured.
#[derive(Debug)]
#[must_use = "call `build` to construct the cache"]
pub struct EnvSwitchableCacheBuilder {
    variable: String,
    path: Utf8PathBuf,
    initialize_if_missing: bool,
    install_root: Option<Utf8PathBuf>,
    store: Option<Arc<dyn EnvStore>>,
}

impl EnvSwitchableCacheBuilder {
    /// Uses `store` instead of the process environment.
    pub fn store(mut self, store: Arc<dyn EnvStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Controls whether enabling creates the cache directory.
    pub const fn initialize_if_missing(mut self, initialize: bool) -> Self {
        self.initialize_if_missing = initialize;
        self
    }

    /// Overrides the installation directory that cache paths should stay out
    /// of. `None` disables the check. Both paths are resolved through
    /// symlinks and the current directory before they are compared.
    pub fn install_root(mut self, root: Option<Utf8PathBuf>) -> Self {
        self.install_root = root;
        self
    }

    /// Captures the variable's current value and returns the cache.
    ///
    /// The store is only read here; nothing is written until the cache is
    /// enabled.
    ///
    /// # Panics
    /// Panics when the variable name is empty or contains `=` or NUL.
    #[must_use]
    pub fn build(self) -> EnvSwitchableCache {
        assert!(
            is_valid_variable(&self.variable),
            "invalid environment variable name {:?}",
            self.variable
        );
        let store = self.store.unwrap_or_else(process_env);
        let original_value = store.get(&self.variable);
        EnvSwitchableCache {
            variable: self.variable,
            path: PathHolder::new(self.path),
            original_value,
            initialize_if_missing: self.initialize_if_missing,
            install_root: self.install_root,
            store,
        }
    }
}

fn is_valid_variable(name: &str) -> bool {
    !name.is_empty() && !name.contains(['=', '\0'])
}

impl EnvSwitchableCache {
    /// Creates a cache for `variable` backed by the process environment that
    /// creates its directory when enabled.
    ///
    /// # Panics
    /// Panics when `variable` is empty or contains `=` or NUL.
    ///
    /// # Examples
    /// ```no_run
    /// use artifact_cache::{EnvSwitchableCache, SwitchableCache};
    ///
    /// # fn main() -> artifact_cache::Result<()> {
    /// let cache = EnvSwitchableCache::new("/tmp/x", "MYVAR");
    /// cache.enable()?;
    /// assert_eq!(std::env::var("MYVAR").as_deref(), Ok("/tmp/x"));
    /// cache.disable();
    /// assert!(std::env::var_os("MYVAR").is_none());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>, variable: impl Into<String>) -> Self {
        Self::builder(path, variable).build()
    }

    /// Starts configuring a cache for `variable` at `path`.
    pub fn builder(
        path: impl Into<Utf8PathBuf>,
        variable: impl Into<String>,
    ) -> EnvSwitchableCacheBuilder {
        EnvSwitchableCacheBuilder {
            variable: variable.into(),
            path: path.into(),
            initialize_if_missing: true,
            install_root: install_root().map(Utf8Path::to_path_buf),
            store: None,
        }
    }

    /// Returns the environment variable this cache controls.
    #[must_use]
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Returns the value the variable held when the cache was constructed.
    #[must_use]
    pub fn original_value(&self) -> Option<&OsStr> {
        self.original_value.as_deref()
    }

    /// Reports whether enabling creates the cache directory.
    #[must_use]
    pub const fn initialize_if_missing(&self) -> bool {
        self.initialize_if_missing
    }

    /// Returns the current cache path.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.path.get()
    }

    /// Points the cache at `path`.
    ///
    /// When the cache is enabled the new path is published straight away, so
    /// the variable moves from the old path to the new one and the cache stays
    /// enabled. A disabled cache only records the new path.
    ///
    /// # Errors
    /// Returns an error when the cache was enabled and the new directory
    /// cannot be created. The new path is kept and the variable still holds
    /// the old one, so the cache then reports itself as disabled.
    pub fn set_path(&self, path: impl Into<Utf8PathBuf>) -> Result<()> {
        let was_enabled = self.is_enabled();
        let previous = self.path.replace(path.into());
        if was_enabled {
            debug!(
                target: LOG_TARGET,
                variable = %self.variable,
                previous = %previous,
                "republishing cache after path change"
            );
            self.enable()?;
        }
        Ok(())
    }

    fn warn_if_install_relative(&self, path: &Utf8Path) {
        let Some(root) = self.install_root.as_deref() else {
            return;
        };
        if is_within(path, root) {
            warn!(
                target: LOG_TARGET,
                variable = %self.variable,
                path = %path,
                install_root = %root,
                "cache path lies inside the installation directory; \
                 downloaded artifacts should be stored elsewhere"
            );
        }
    }
}

impl SwitchableCache for EnvSwitchableCache {
    fn is_enabled(&self) -> bool {
        self.path
            .try_get()
            .is_some_and(|path| self.store.is_set_to(&self.variable, path.as_str()))
    }

    fn enable(&self) -> Result<()> {
        let path = self.path.get();
        self.warn_if_install_relative(&path);
        if self.initialize_if_missing {
            ensure_dir_exists(&path).map_err(|report| DirectoryError::new(&path, report))?;
        }
        if self.store.is_set_to(&self.variable, path.as_str()) {
            debug!(
                target: LOG_TARGET,
                variable = %self.variable,
                path = %path,
                "cache already enabled"
            );
            return Ok(());
        }
        self.store.set(&self.variable, path.as_os_str());
        info!(
            target: LOG_TARGET,
            variable = %self.variable,
            path = %path,
            "enabled cache"
        );
        Ok(())
    }

    fn disable(&self) {
        if !self.is_enabled() {
            return;
        }
        match &self.original_value {
            Some(original) => {
                self.store.set(&self.variable, original);
                info!(
                    target: LOG_TARGET,
                    variable = %self.variable,
                    "disabled cache; restored original value"
                );
            }
            None => {
                self.store.remove(&self.variable);
                info!(
                    target: LOG_TARGET,
                    variable = %self.variable,
                    "disabled cache; removed variable"
                );
            }
        }
    }
}

impl PathCache for EnvSwitchableCache {
    fn path(&self) -> Utf8PathBuf {
        Self::path(self)
    }

    fn set_path(&self, path: Utf8PathBuf) -> Result<()> {
        Self::set_path(self, path)
    }
}

impl fmt::Debug for EnvSwitchableCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "EnvSwitchableCache({:?}, {:?})",
            self.path.get().as_str(),
            self.variable
        )
    }
}
