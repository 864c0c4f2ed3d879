//! Default cache locations rooted under one shared central directory.
//!
//! # Root resolution
//!
//! The central root is resolved every time a path is requested, in the
//! following order:
//!
//! 1. An explicit root set with [`CentralLocation::with_root`]
//! 2. `ARTIFACT_CACHE_CENTRAL_LOCATION` if set and non-empty
//! 3. `$XDG_CACHE_HOME/artifact-cache` if `XDG_CACHE_HOME` is set
//! 4. `~/.cache/artifact-cache` as fallback
//! 5. `/tmp/artifact-cache` as last resort
//!
//! Because the variable is read at call time, enabling the cache returned by
//! [`CentralLocation::switchable_root`] redirects every default path built
//! afterwards.

use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use once_cell::sync::Lazy;

use crate::cache::EnvSwitchableCache;
use crate::env::{EnvStore, process_env};

#[cfg(test)]
mod tests;

/// Environment variable naming the central cache root.
pub const CENTRAL_LOCATION_ENV: &str = "ARTIFACT_CACHE_CENTRAL_LOCATION";

/// Directory created under the user cache directory when no root is configured.
const DEFAULT_SUBDIR: &str = "artifact-cache";

/// Builds default cache paths and caches beneath the central root.
#[derive(Debug, Clone)]
pub struct CentralLocation {
    store: Arc<dyn EnvStore>,
    root: Option<Utf8PathBuf>,
    initialize_if_missing: bool,
}

impl Default for CentralLocation {
    fn default() -> Self {
        Self::process()
    }
}

impl CentralLocation {
    /// Resolves locations from the process environment.
    #[must_use]
    pub fn process() -> Self {
        Self::with_store(process_env())
    }

    /// Resolves locations from `store`. Caches built by this location share
    /// the same store.
    #[must_use]
    pub fn with_store(store: Arc<dyn EnvStore>) -> Self {
        Self {
            store,
            root: None,
            initialize_if_missing: true,
        }
    }

    /// Pins the central root, ignoring the environment.
    #[must_use]
    pub fn with_root(mut self, root: impl Into<Utf8PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Controls whether caches built here create their directory when
    /// enabled.
    #[must_use]
    pub const fn initialize_if_missing(mut self, initialize: bool) -> Self {
        self.initialize_if_missing = initialize;
        self
    }

    /// Returns the store this location reads from.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn EnvStore> {
        &self.store
    }

    /// Resolves the central root directory.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use artifact_cache::{CENTRAL_LOCATION_ENV, CentralLocation, MemoryEnv};
    ///
    /// let store = Arc::new(MemoryEnv::from_vars([(CENTRAL_LOCATION_ENV, "/srv/artifacts")]));
    /// let location = CentralLocation::with_store(store);
    /// assert_eq!(location.root().as_str(), "/srv/artifacts");
    /// ```
    #[must_use]
    pub fn root(&self) -> Utf8PathBuf {
        if let Some(root) = &self.root {
            return root.clone();
        }
        if let Some(dir) = self.resolve_from_env() {
            return dir;
        }
        if let Some(dir) = self.resolve_from_xdg_cache() {
            return dir;
        }
        if let Some(dir) = resolve_from_home() {
            return dir;
        }
        Utf8Path::new("/tmp").join(DEFAULT_SUBDIR)
    }

    /// Returns the default path for `namespace`, a `/`-separated library
    /// identifier such as `huggingface/transformers`.
    #[must_use]
    pub fn path_for(&self, namespace: &str) -> Utf8PathBuf {
        namespace
            .split('/')
            .map(str::trim)
            .filter(|segment| !segment.is_empty() && *segment != "." && *segment != "..")
            .fold(self.root(), |path, segment| path.join(segment))
    }

    /// Builds a cache for `variable` at the default path of `namespace`.
    ///
    /// # Panics
    /// Panics when `variable` is not a valid environment variable name, as
    /// [`EnvSwitchableCache::new`] does.
    #[must_use]
    pub fn cache_for(&self, namespace: &str, variable: &str) -> EnvSwitchableCache {
        EnvSwitchableCache::builder(self.path_for(namespace), variable)
            .store(Arc::clone(&self.store))
            .initialize_if_missing(self.initialize_if_missing)
            .build()
    }

    /// Builds a cache that moves the central root itself to `path`.
    ///
    /// While it is enabled, locations without an explicit root resolve every
    /// default path beneath `path`.
    #[must_use]
    pub fn switchable_root(&self, path: impl Into<Utf8PathBuf>) -> EnvSwitchableCache {
        EnvSwitchableCache::builder(path, CENTRAL_LOCATION_ENV)
            .store(Arc::clone(&self.store))
            .initialize_if_missing(self.initialize_if_missing)
            .build()
    }

    fn resolve_from_env(&self) -> Option<Utf8PathBuf> {
        non_empty_utf8(self.store.get(CENTRAL_LOCATION_ENV)?)
    }

    fn resolve_from_xdg_cache(&self) -> Option<Utf8PathBuf> {
        let path = non_empty_utf8(self.store.get("XDG_CACHE_HOME")?)?;
        Some(path.join(DEFAULT_SUBDIR))
    }
}

fn non_empty_utf8(raw: OsString) -> Option<Utf8PathBuf> {
    let value = raw.into_string().ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(Utf8PathBuf::from(trimmed))
}

fn resolve_from_home() -> Option<Utf8PathBuf> {
    let home = dirs::home_dir()?;
    let path = Utf8PathBuf::from_path_buf(home).ok()?;
    Some(path.join(".cache").join(DEFAULT_SUBDIR))
}

static INSTALL_ROOT: Lazy<Option<Utf8PathBuf>> = Lazy::new(|| {
    let exe = env::current_exe().ok()?;
    let dir = exe.parent()?.to_path_buf();
    Utf8PathBuf::from_path_buf(dir).ok()
});

/// Returns the directory holding the running executable.
///
/// Downloaded artifacts do not belong there; caches warn when enabled with a
/// path inside it.
#[must_use]
pub fn install_root() -> Option<&'static Utf8Path> {
    INSTALL_ROOT.as_deref()
}
