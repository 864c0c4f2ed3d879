//! Ready-made caches for supported third-party libraries.
//!
//! Every library offers a `build` function producing fresh caches beneath a
//! [`CentralLocation`] and a `cache` function returning the process-wide
//! default, created from the process environment on first access. Defaults
//! capture each variable's original value at that moment.

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;

use crate::cache::{EnvSwitchableCache, SwitchableAggregate, SwitchableCache};
use crate::location::CentralLocation;

pub mod huggingface;
pub mod nltk;

/// A supported library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Library {
    /// NLTK data packages.
    Nltk,
    /// Every Hugging Face cache (`HF_HOME`, `transformers`, `datasets`).
    Huggingface,
    /// Only the `transformers` model cache.
    Transformers,
    /// Only the `datasets` cache.
    Datasets,
}

/// One environment-backed cache belonging to a library.
#[derive(Debug, Clone)]
pub struct LibraryEntry {
    /// Library the cache belongs to.
    pub library: Library,
    /// Member name of the cache within the library.
    pub member: &'static str,
    /// The cache itself.
    pub cache: Arc<EnvSwitchableCache>,
}

impl Library {
    /// Every supported library, including the Hugging Face sub-libraries.
    pub const ALL: [Self; 4] = [
        Self::Nltk,
        Self::Huggingface,
        Self::Transformers,
        Self::Datasets,
    ];

    /// Libraries that together cover every cache without overlap.
    pub const TOP_LEVEL: [Self; 2] = [Self::Nltk, Self::Huggingface];

    /// Returns the stable name of the library.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Nltk => "nltk",
            Self::Huggingface => "huggingface",
            Self::Transformers => "transformers",
            Self::Datasets => "datasets",
        }
    }

    /// Builds fresh environment-backed caches for this library beneath
    /// `location`.
    #[must_use]
    pub fn entries(self, location: &CentralLocation) -> Vec<LibraryEntry> {
        let entry = |member, cache| LibraryEntry {
            library: self,
            member,
            cache: Arc::new(cache),
        };
        match self {
            Self::Nltk => vec![entry(self.name(), nltk::build(location))],
            Self::Huggingface => vec![
                entry(
                    huggingface::INTERNAL_MEMBER,
                    huggingface::build_internal(location),
                ),
                entry(
                    huggingface::transformers::MEMBER,
                    huggingface::transformers::build(location),
                ),
                entry(
                    huggingface::datasets::MEMBER,
                    huggingface::datasets::build(location),
                ),
            ],
            Self::Transformers => vec![entry(
                huggingface::transformers::MEMBER,
                huggingface::transformers::build(location),
            )],
            Self::Datasets => vec![entry(
                huggingface::datasets::MEMBER,
                huggingface::datasets::build(location),
            )],
        }
    }

    /// Builds a fresh cache for this library beneath `location`.
    ///
    /// Libraries with several variables produce an aggregate keyed by member
    /// name.
    #[must_use]
    pub fn build(self, location: &CentralLocation) -> Arc<dyn SwitchableCache> {
        match self {
            Self::Nltk => Arc::new(nltk::build(location)),
            Self::Huggingface => Arc::new(huggingface::build(location)),
            Self::Transformers => Arc::new(huggingface::transformers::build(location)),
            Self::Datasets => Arc::new(huggingface::datasets::build(location)),
        }
    }

    /// Returns the process-wide default cache for this library.
    #[must_use]
    pub fn default_cache(self) -> Arc<dyn SwitchableCache> {
        match self {
            Self::Nltk => nltk::cache(),
            Self::Huggingface => huggingface::cache(),
            Self::Transformers => huggingface::transformers::cache(),
            Self::Datasets => huggingface::datasets::cache(),
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Builds one aggregate holding a fresh cache per library, keyed by library
/// name. An empty selection covers [`Library::TOP_LEVEL`].
#[must_use]
pub fn aggregate_for(libraries: &[Library], location: &CentralLocation) -> SwitchableAggregate {
    let selected: &[Library] = if libraries.is_empty() {
        &Library::TOP_LEVEL
    } else {
        libraries
    };
    selected
        .iter()
        .fold(SwitchableAggregate::builder(), |builder, library| {
            builder.shared_member(library.name(), library.build(location))
        })
        .build()
}
