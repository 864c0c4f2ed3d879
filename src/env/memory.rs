//! In-memory store for isolated tests and embedding.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::EnvStore;

/// An isolated environment table that never touches the process environment.
#[derive(Debug, Default)]
pub struct MemoryEnv {
    vars: Mutex<BTreeMap<String, OsString>>,
}

impl MemoryEnv {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table pre-populated with `vars`.
    #[must_use]
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OsString>,
    {
        let vars = vars
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            vars: Mutex::new(vars),
        }
    }

    /// Returns a copy of every variable currently in the table.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, OsString> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, OsString>> {
        self.vars.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<OsString> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &OsStr) {
        self.lock().insert(key.to_owned(), value.to_os_string());
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}
