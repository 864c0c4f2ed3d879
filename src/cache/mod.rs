//! Switchable caches: settings that can be toggled on and off, restoring
//! whatever was there before when switched off.
//!
//! [`EnvSwitchableCache`] publishes a directory through one environment
//! variable. [`SwitchableAggregate`] groups several caches, including other
//! aggregates, behind a single switch. [`CacheGuard`] and [`with_enabled`]
//! keep a cache enabled for the duration of a unit of work.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//!
//! use artifact_cache::{EnvStore, EnvSwitchableCache, MemoryEnv, SwitchableCache};
//!
//! # fn main() -> artifact_cache::Result<()> {
//! let store = Arc::new(MemoryEnv::new());
//! let cache = EnvSwitchableCache::builder("/srv/nltk", "NLTK_DATA")
//!     .store(store.clone())
//!     .initialize_if_missing(false)
//!     .build();
//!
//! cache.enable()?;
//! assert!(store.is_set_to("NLTK_DATA", "/srv/nltk"));
//! cache.disable();
//! assert!(store.get("NLTK_DATA").is_none());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use camino::Utf8PathBuf;

use crate::error::Result;

mod aggregate;
mod env_cache;
mod path;
mod scope;
mod summary;

pub use aggregate::{SwitchableAggregate, SwitchableAggregateBuilder};
pub use env_cache::{EnvSwitchableCache, EnvSwitchableCacheBuilder};
pub use path::PathHolder;
pub use scope::{CacheGuard, with_enabled};

/// A cache that can be enabled and disabled.
///
/// `enable` and `disable` must be idempotent: aggregates broadcast both
/// operations to every member regardless of its current state.
pub trait SwitchableCache: fmt::Debug + Send + Sync {
    /// Reports whether the cache is currently in use.
    fn is_enabled(&self) -> bool;

    /// Points the consuming library at this cache.
    ///
    /// # Errors
    /// Returns an error when the cache location cannot be prepared.
    fn enable(&self) -> Result<()>;

    /// Restores the setting this cache replaced.
    fn disable(&self);

    /// Enables the cache until the returned guard is dropped.
    ///
    /// # Errors
    /// Returns the error raised by [`SwitchableCache::enable`].
    fn enter(&self) -> Result<CacheGuard<'_, Self>>
    where
        Self: Sized,
    {
        CacheGuard::enter(self)
    }
}

impl<T> SwitchableCache for Arc<T>
where
    T: SwitchableCache + ?Sized,
{
    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }

    fn enable(&self) -> Result<()> {
        (**self).enable()
    }

    fn disable(&self) {
        (**self).disable();
    }
}

/// A cache addressed through a filesystem path.
///
/// Setting the path is the hook switchable implementations use to keep their
/// published state in sync with the new location.
pub trait PathCache {
    /// Returns the current cache path.
    fn path(&self) -> Utf8PathBuf;

    /// Replaces the cache path.
    ///
    /// # Errors
    /// Implementations that republish the path while enabled return the error
    /// raised while doing so.
    fn set_path(&self, path: Utf8PathBuf) -> Result<()>;
}
