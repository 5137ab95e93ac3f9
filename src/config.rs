//! Options file describing how a [`crate::Vite`] instance should be constructed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{Result, ViteError};

/// Options file looked up by [`ViteOptions::discover`].
pub const DEFAULT_CONFIG_FILE: &str = "vite-tags.json";
/// Directory holding the build output and hot file.
pub const DEFAULT_PUBLIC_DIR: &str = "public";
/// Build directory relative to the public directory.
pub const DEFAULT_BUILD_DIR: &str = "build";
/// Manifest file name inside `{build_dir}/.vite/`.
pub const DEFAULT_MANIFEST_FILENAME: &str = "manifest.json";
/// Chunk field read for subresource integrity hashes.
pub const DEFAULT_INTEGRITY_KEY: &str = "integrity";

/// `integrityKey` accepts a field name or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum IntegrityKeyOption {
  /// Field name to read from each chunk.
  Key(String),
  /// Only `false` is meaningful; `true` is rejected when the options are applied.
  Enabled(bool),
}

/// Construction options, every field optional so that absent keys keep the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViteOptions {
  /// Dev server sentinel path.
  pub hotfile: Option<PathBuf>,
  /// Default build directory.
  pub build_dir: Option<String>,
  /// Public directory, also accepted as `publicPath`.
  #[serde(alias = "publicPath")]
  pub public_dir: Option<PathBuf>,
  /// Manifest file name.
  pub manifest_filename: Option<String>,
  /// Integrity field name, or `false` to disable integrity attributes.
  pub integrity_key: Option<IntegrityKeyOption>,
  /// `Some(Some(_))` is a fixed nonce, `Some(None)` (JSON `null`) requests a generated one.
  #[serde(deserialize_with = "present")]
  pub nonce: Option<Option<String>>,
  /// Static attribute object, or an array of them, for script tags.
  pub script_tag_attributes_resolvers: Option<Value>,
  /// Static attribute object, or an array of them, for stylesheet tags.
  pub style_tag_attributes_resolvers: Option<Value>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  T::deserialize(deserializer).map(Some)
}

impl ViteOptions {
  /// Look for [`DEFAULT_CONFIG_FILE`] in `dir`.
  ///
  /// A missing file yields the defaults; a file that exists but cannot be read or parsed is
  /// an error.
  pub fn discover(dir: &Path) -> Result<Self> {
    let candidate = dir.join(DEFAULT_CONFIG_FILE);
    if !candidate.is_file() {
      return Ok(Self::default());
    }
    Self::from_path(&candidate)
  }

  /// Read options from a specific JSON file.
  pub fn from_path(path: &Path) -> Result<Self> {
    let content = fs::read_to_string(path).map_err(|source| ViteError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|err| {
      ViteError::configuration(format!("failed to parse {}: {err}", path.display()))
    })
  }
}
