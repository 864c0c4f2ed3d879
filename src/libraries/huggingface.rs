//! Caches for the Hugging Face libraries.
//!
//! Enabling these only affects a library that reads its variables after the
//! switch, so enable them before the consuming process starts or imports the
//! library.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::cache::{EnvSwitchableCache, SwitchableAggregate};
use crate::location::CentralLocation;

/// Variable naming the shared Hugging Face home directory.
pub const VARIABLE: &str = "HF_HOME";

/// Namespace of the default path beneath the central root.
pub const NAMESPACE: &str = "huggingface";

/// Member name of the `HF_HOME` cache inside the aggregate.
pub const INTERNAL_MEMBER: &str = "internal_cache";

static INTERNAL_CACHE: Lazy<Arc<EnvSwitchableCache>> =
    Lazy::new(|| Arc::new(build_internal(&CentralLocation::process())));

static CACHE: Lazy<Arc<SwitchableAggregate>> = Lazy::new(|| {
    Arc::new(aggregate(
        internal_cache(),
        transformers::cache(),
        datasets::cache(),
    ))
});

/// Cache for models downloaded by `transformers`.
pub mod transformers {
    use super::{Arc, CentralLocation, EnvSwitchableCache, Lazy};

    /// Variable `transformers` reads for its model cache.
    pub const VARIABLE: &str = "TRANSFORMERS_CACHE";

    /// Namespace of the default path beneath the central root.
    pub const NAMESPACE: &str = "huggingface/transformers";

    /// Member name inside the Hugging Face aggregate.
    pub const MEMBER: &str = "transformers";

    static CACHE: Lazy<Arc<EnvSwitchableCache>> =
        Lazy::new(|| Arc::new(build(&CentralLocation::process())));

    /// Builds a fresh `transformers` cache beneath `location`.
    #[must_use]
    pub fn build(location: &CentralLocation) -> EnvSwitchableCache {
        location.cache_for(NAMESPACE, VARIABLE)
    }

    /// Returns the process-wide `transformers` cache.
    #[must_use]
    pub fn cache() -> Arc<EnvSwitchableCache> {
        Arc::clone(&CACHE)
    }
}

/// Cache for datasets downloaded by `datasets`.
pub mod datasets {
    use super::{Arc, CentralLocation, EnvSwitchableCache, Lazy};

    /// Variable `datasets` reads for its dataset cache.
    pub const VARIABLE: &str = "HF_DATASETS_CACHE";

    /// Namespace of the default path beneath the central root.
    pub const NAMESPACE: &str = "huggingface/datasets";

    /// Member name inside the Hugging Face aggregate.
    pub const MEMBER: &str = "datasets";

    static CACHE: Lazy<Arc<EnvSwitchableCache>> =
        Lazy::new(|| Arc::new(build(&CentralLocation::process())));

    /// Builds a fresh `datasets` cache beneath `location`.
    #[must_use]
    pub fn build(location: &CentralLocation) -> EnvSwitchableCache {
        location.cache_for(NAMESPACE, VARIABLE)
    }

    /// Returns the process-wide `datasets` cache.
    #[must_use]
    pub fn cache() -> Arc<EnvSwitchableCache> {
        Arc::clone(&CACHE)
    }
}

/// Builds a fresh `HF_HOME` cache beneath `location`.
#[must_use]
pub fn build_internal(location: &CentralLocation) -> EnvSwitchableCache {
    location.cache_for(NAMESPACE, VARIABLE)
}

/// Builds a fresh aggregate of every Hugging Face cache beneath `location`.
#[must_use]
pub fn build(location: &CentralLocation) -> SwitchableAggregate {
    aggregate(
        Arc::new(build_internal(location)),
        Arc::new(transformers::build(location)),
        Arc::new(datasets::build(location)),
    )
}

/// Returns the process-wide `HF_HOME` cache.
#[must_use]
pub fn internal_cache() -> Arc<EnvSwitchableCache> {
    Arc::clone(&INTERNAL_CACHE)
}

/// Returns the process-wide Hugging Face aggregate.
///
/// Its members are the same instances returned by [`internal_cache`],
/// [`transformers::cache`] and [`datasets::cache`].
#[must_use]
pub fn cache() -> Arc<SwitchableAggregate> {
    Arc::clone(&CACHE)
}

fn aggregate(
    internal: Arc<EnvSwitchableCache>,
    models: Arc<EnvSwitchableCache>,
    data: Arc<EnvSwitchableCache>,
) -> SwitchableAggregate {
    SwitchableAggregate::builder()
        .member(INTERNAL_MEMBER, internal)
        .member(transformers::MEMBER, models)
        .member(datasets::MEMBER, data)
        .build()
}
