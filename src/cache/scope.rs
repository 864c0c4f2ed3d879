//! Scoped use of switchable caches.
//!
//! A [`CacheGuard`] enables its cache on creation and disables it when
//! dropped, including while unwinding from a panic. Errors produced inside
//! the scope are never intercepted: [`with_enabled`] hands the closure's
//! return value back untouched.

use std::fmt;
use std::ops::Deref;

use tracing::{info, info_span, warn};

use super::SwitchableCache;
use crate::error::Result;
use crate::observability::LOG_TARGET;

/// Keeps a cache enabled until dropped.
#[must_use = "Hold the guard until the end of the cache scope"]
pub struct CacheGuard<'a, C>
where
    C: SwitchableCache + ?Sized,
{
    cache: &'a C,
    span: tracing::Span,
}

impl<'a, C> CacheGuard<'a, C>
where
    C: SwitchableCache + ?Sized,
{
    /// Enables `cache` and returns a guard that disables it on drop.
    ///
    /// # Errors
    /// Returns the error raised by [`SwitchableCache::enable`]. Members an
    /// aggregate managed to enable before the failure are disabled again
    /// first, so a failed entry leaves nothing switched on.
    pub fn enter(cache: &'a C) -> Result<Self> {
        let span = info_span!(target: LOG_TARGET, "cache_scope", cache = ?cache);
        {
            let _entered = span.enter();
            if let Err(err) = cache.enable() {
                warn!(
                    target: LOG_TARGET,
                    error = %err,
                    "failed to enter cache scope; disabling again"
                );
                cache.disable();
                return Err(err);
            }
            info!(target: LOG_TARGET, "entered cache scope");
        }
        Ok(Self { cache, span })
    }

    /// Returns the guarded cache.
    #[must_use]
    pub const fn cache(&self) -> &'a C {
        self.cache
    }
}

impl<C> Deref for CacheGuard<'_, C>
where
    C: SwitchableCache + ?Sized,
{
    type Target = C;

    fn deref(&self) -> &Self::Target {
        self.cache
    }
}

impl<C> Drop for CacheGuard<'_, C>
where
    C: SwitchableCache + ?Sized,
{
    fn drop(&mut self) {
        let _entered = self.span.enter();
        self.cache.disable();
        info!(target: LOG_TARGET, "left cache scope");
    }
}

impl<C> fmt::Debug for CacheGuard<'_, C>
where
    C: SwitchableCache + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheGuard")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

/// Runs `body` with `cache` enabled and disables it afterwards.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use artifact_cache::{EnvStore, EnvSwitchableCache, MemoryEnv, with_enabled};
///
/// # fn main() -> artifact_cache::Result<()> {
/// let store = Arc::new(MemoryEnv::new());
/// let cache = EnvSwitchableCache::builder("/srv/hf", "HF_HOME")
///     .store(store.clone())
///     .initialize_if_missing(false)
///     .build();
///
/// let seen = with_enabled(&cache, |_| store.get("HF_HOME"))?;
/// assert_eq!(seen.as_deref(), Some(std::ffi::OsStr::new("/srv/hf")));
/// assert!(store.get("HF_HOME").is_none());
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns the error raised while enabling the cache. The closure's own
/// result is returned as the `Ok` value, so fallible bodies produce a nested
/// `Result` that callers inspect themselves.
pub fn with_enabled<C, F, R>(cache: &C, body: F) -> Result<R>
where
    C: SwitchableCache + ?Sized,
    F: FnOnce(&C) -> R,
{
    let guard = CacheGuard::enter(cache)?;
    let output = body(guard.cache());
    drop(guard);
    Ok(output)
}
