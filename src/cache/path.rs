//! Mutable path storage shared by path-backed caches.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use camino::Utf8PathBuf;

use super::PathCache;
use crate::error::Result;

/// Owns a cache path that can be read and replaced through a shared reference.
pub struct PathHolder {
    path: Mutex<Utf8PathBuf>,
}

impl PathHolder {
    /// Creates a holder with the initial `path`.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: Mutex::new(path.into()),
        }
    }

    /// Returns the last path set.
    #[must_use]
    pub fn get(&self) -> Utf8PathBuf {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the last path set, or `None` if a writer panicked while
    /// holding the value.
    #[must_use]
    pub fn try_get(&self) -> Option<Utf8PathBuf> {
        self.path.lock().ok().map(|path| path.clone())
    }

    /// Stores `path` and returns the value it replaced.
    pub fn replace(&self, path: Utf8PathBuf) -> Utf8PathBuf {
        let mut guard = self.path.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, path)
    }
}

impl PathCache for PathHolder {
    fn path(&self) -> Utf8PathBuf {
        self.get()
    }

    fn set_path(&self, path: Utf8PathBuf) -> Result<()> {
        self.replace(path);
        Ok(())
    }
}

impl Clone for PathHolder {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl fmt::Debug for PathHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PathHolder").field(&self.get()).finish()
    }
}
