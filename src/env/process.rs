//! Store backed by the real process environment.

use std::env;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard};

use super::EnvStore;
use crate::observability::LOG_TARGET;

pub(crate) static ENV_LOCK: Mutex<()> = Mutex::new(());

/// The process-wide environment table.
///
/// Every individual read and write is serialised behind one mutex. Sequences
/// of calls (such as a cache's enable) are not atomic with respect to other
/// threads; callers that switch caches concurrently must serialise those
/// operations themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    fn lock() -> MutexGuard<'static, ()> {
        if ENV_LOCK.is_poisoned() {
            tracing::warn!(
                target: LOG_TARGET,
                "ENV_LOCK was poisoned; clearing poison and proceeding"
            );
            ENV_LOCK.clear_poison();
        }
        ENV_LOCK
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn validate_env_key(key: &str) {
        assert!(
            !key.is_empty(),
            "ProcessEnv received an empty environment variable name"
        );
        assert!(
            !key.contains('=') && !key.contains('\0'),
            "ProcessEnv received an environment variable name containing '=' or NUL"
        );
    }
}

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        if key.is_empty() || key.contains(['=', '\0']) {
            return None;
        }
        let _guard = Self::lock();
        env::var_os(key)
    }

    /// # Panics
    /// Panics when `key` is empty or contains `=` or NUL, mirroring
    /// [`std::env::set_var`].
    fn set(&self, key: &str, value: &OsStr) {
        Self::validate_env_key(key);
        let _guard = Self::lock();
        unsafe {
            // SAFETY: `ENV_LOCK` serialises every access made through this
            // store, so no other store call observes a torn update.
            env::set_var(key, value);
        }
    }

    /// # Panics
    /// Panics when `key` is empty or contains `=` or NUL, mirroring
    /// [`std::env::remove_var`].
    fn remove(&self, key: &str) {
        Self::validate_env_key(key);
        let _guard = Self::lock();
        unsafe {
            // SAFETY: `ENV_LOCK` serialises every access made through this
            // store, so no other store call observes a torn update.
            env::remove_var(key);
        }
    }
}
