//! Error taxonomy shared by manifest loading, tag rendering and construction.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = ViteError> = std::result::Result<T, E>;

/// Failures raised while resolving Vite assets.
///
/// None of these are recovered internally: a failing render produces no tags at all.
#[derive(Debug, Error)]
pub enum ViteError {
  /// The computed manifest path does not point at a file.
  #[error("Vite manifest not found at path: {}", path.display())]
  ManifestNotFound {
    /// Path that was probed.
    path: PathBuf,
  },
  /// The manifest exists but is not a JSON object of chunk records.
  #[error("Invalid JSON in Vite manifest file at: {}: {source}", path.display())]
  ManifestInvalid {
    /// Path of the offending manifest.
    path: PathBuf,
    /// Underlying parse error.
    #[source]
    source: serde_json::Error,
  },
  /// A file exists but could not be read.
  #[error("failed to read {}: {source}", path.display())]
  Io {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    #[source]
    source: std::io::Error,
  },
  /// A requested entry (or an import of one) is missing from the manifest.
  #[error("Unable to find entry in Vite manifest: {entry}")]
  EntryNotFound {
    /// Manifest key that was looked up.
    entry: String,
  },
  /// Construction options were malformed.
  #[error("{0}")]
  Configuration(String),
  /// The operating system could not supply random bytes for a nonce.
  #[error("failed to generate random nonce: {0}")]
  Random(String),
}

impl ViteError {
  pub(crate) fn entry_not_found(entry: impl Into<String>) -> Self {
    Self::EntryNotFound {
      entry: entry.into(),
    }
  }

  pub(crate) fn configuration(message: impl Into<String>) -> Self {
    Self::Configuration(message.into())
  }
}
