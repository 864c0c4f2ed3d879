//! Key-value stores standing in for the process environment table.
//!
//! Caches never touch `std::env` directly. They read and write through an
//! [`EnvStore`], which is the real process environment by default and an
//! isolated in-memory table in tests or embedding applications that must not
//! leak variables into child processes.
//!
//! # Example
//! ```
//! use std::ffi::OsStr;
//!
//! use artifact_cache::{EnvStore, MemoryEnv};
//!
//! let store = MemoryEnv::from_vars([("HF_HOME", "/srv/models")]);
//! assert_eq!(store.get("HF_HOME").as_deref(), Some(OsStr::new("/srv/models")));
//! store.remove("HF_HOME");
//! assert!(store.get("HF_HOME").is_none());
//! ```

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;

mod memory;
mod process;

pub use memory::MemoryEnv;
pub use process::ProcessEnv;

/// Read/write access to a table of environment variables.
///
/// Implementations use interior mutability so a single store can be shared
/// between many caches through an [`Arc`].
pub trait EnvStore: fmt::Debug + Send + Sync {
    /// Returns the current value of `key`, or `None` when it is unset.
    fn get(&self, key: &str) -> Option<OsString>;

    /// Sets `key` to `value`, replacing any previous value.
    fn set(&self, key: &str, value: &OsStr);

    /// Removes `key` from the table. Removing an unset key is a no-op.
    fn remove(&self, key: &str);

    /// Reports whether `key` is set to exactly `expected`.
    fn is_set_to(&self, key: &str, expected: &str) -> bool {
        self.get(key).is_some_and(|value| value == expected)
    }
}

static PROCESS_ENV: Lazy<Arc<dyn EnvStore>> = Lazy::new(|| Arc::new(ProcessEnv));

/// Returns the shared handle to the process environment store.
#[must_use]
pub fn process_env() -> Arc<dyn EnvStore> {
    Arc::clone(&PROCESS_ENV)
}
