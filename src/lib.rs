//! Switchable caches that redirect where third-party libraries store their
//! downloaded artifacts.
//!
//! A cache publishes a directory through an environment variable while it is
//! enabled and restores the variable's previous value when disabled. Several
//! caches can be grouped into one switch, and ready-made caches for common
//! machine-learning libraries live beneath a single central root.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//!
//! use artifact_cache::{CentralLocation, EnvStore, MemoryEnv, SwitchableCache, with_enabled};
//! use artifact_cache::libraries::nltk;
//!
//! # fn main() -> artifact_cache::Result<()> {
//! let store = Arc::new(MemoryEnv::new());
//! let location = CentralLocation::with_store(store.clone())
//!     .with_root("/srv/cache")
//!     .initialize_if_missing(false);
//! let cache = nltk::build(&location);
//!
//! with_enabled(&cache, |_| {
//!     assert!(store.is_set_to("NLTK_DATA", "/srv/cache/nltk"));
//! })?;
//! assert!(!cache.is_enabled());
//! # Ok(())
//! # }
//! ```

pub mod cache;
#[doc(hidden)]
pub mod cli;
mod config;
pub mod env;
mod error;
mod fs;
pub mod libraries;
pub mod location;
mod observability;
#[doc(hidden)]
pub mod test_support;

pub use cache::{
    CacheGuard, EnvSwitchableCache, EnvSwitchableCacheBuilder, PathCache, PathHolder,
    SwitchableAggregate, SwitchableAggregateBuilder, SwitchableCache, with_enabled,
};
pub use config::CacheEnvCfg;
pub use env::{EnvStore, MemoryEnv, ProcessEnv, process_env};
pub use error::{
    ArtifactCacheError, CommandError, ConfigError, ConfigResult, DirectoryError, Result,
};
pub use libraries::{Library, LibraryEntry, aggregate_for};
pub use location::{CENTRAL_LOCATION_ENV, CentralLocation, install_root};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
