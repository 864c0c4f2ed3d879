//! Domain error types for switchable artifact caches.

use camino::{Utf8Path, Utf8PathBuf};
use color_eyre::Report;
use thiserror::Error;

/// Result alias for operations that may return an [`ArtifactCacheError`].
pub type Result<T> = std::result::Result<T, ArtifactCacheError>;

/// Result alias for configuration fallible operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Top-level error exposed by the crate.
#[derive(Debug, Error)]
pub enum ArtifactCacheError {
    /// Indicates the cache directory could not be prepared while enabling.
    #[error("cache directory preparation failed")]
    Directory(#[from] DirectoryError),
    /// Indicates configuration parsing failed.
    #[error("configuration parsing failed")]
    Config(#[from] ConfigError),
    /// Indicates a command launched with enabled caches could not run.
    #[error("command execution failed")]
    Command(#[from] CommandError),
    /// Indicates command-line output could not be written.
    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

/// Captures failures to create the directory backing a cache.
#[derive(Debug, Error)]
#[error("failed to prepare cache directory {path}: {report}")]
pub struct DirectoryError {
    path: Utf8PathBuf,
    #[source]
    report: Report,
}

impl DirectoryError {
    /// Constructs a directory error for `path` with the underlying diagnostic
    /// report.
    #[must_use]
    pub fn new(path: &Utf8Path, report: Report) -> Self {
        Self {
            path: path.to_path_buf(),
            report,
        }
    }

    /// Returns the directory that could not be prepared.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Extracts the underlying diagnostic report.
    pub fn into_report(self) -> Report {
        self.report
    }
}

/// Captures configuration failures.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ConfigError(#[from] Report);

/// Captures failures to launch or await a child command.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct CommandError(#[from] Report);
