//! Cache for data packages downloaded by NLTK.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::cache::EnvSwitchableCache;
use crate::location::CentralLocation;

/// Variable NLTK searches for its data directory.
pub const VARIABLE: &str = "NLTK_DATA";

/// Namespace of the default path beneath the central root.
pub const NAMESPACE: &str = "nltk";

static CACHE: Lazy<Arc<EnvSwitchableCache>> =
    Lazy::new(|| Arc::new(build(&CentralLocation::process())));

/// Builds a fresh NLTK cache beneath `location`.
#[must_use]
pub fn build(location: &CentralLocation) -> EnvSwitchableCache {
    location.cache_for(NAMESPACE, VARIABLE)
}

/// Returns the process-wide NLTK cache, created on first access.
#[must_use]
pub fn cache() -> Arc<EnvSwitchableCache> {
    Arc::clone(&CACHE)
}
