//! Loading and querying the `.vite/manifest.json` emitted by `vite build`.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, ViteError};

/// One compiled output described by the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Chunk {
  /// Compiled output path relative to the build directory.
  pub file: String,
  /// Source module the chunk was built from.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub src: Option<String>,
  /// Stylesheets emitted directly by this chunk.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub css: Vec<String>,
  /// Manifest keys of the chunks this one statically imports.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub imports: Vec<String>,
  /// Every other field, including the integrity hash when the build adds one.
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Chunk {
  /// Create a chunk for the given compiled file with no dependencies.
  pub fn new(file: impl Into<String>) -> Self {
    Self {
      file: file.into(),
      src: None,
      css: Vec::new(),
      imports: Vec::new(),
      extra: Map::new(),
    }
  }

  /// Look up any field by its manifest name, such as `integrity` or `src`.
  pub fn field(&self, name: &str) -> Option<Value> {
    match name {
      "file" => Some(Value::String(self.file.clone())),
      "src" => self.src.clone().map(Value::String),
      "css" if !self.css.is_empty() => Some(Value::from(self.css.clone())),
      "imports" if !self.imports.is_empty() => Some(Value::from(self.imports.clone())),
      _ => self.extra.get(name).cloned(),
    }
  }
}

/// Parsed manifest keyed by entry identifier, in the order the build wrote them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Manifest {
  chunks: IndexMap<String, Chunk>,
}

impl Manifest {
  /// Read and parse the manifest at `path`.
  pub fn load(path: &Path) -> Result<Self> {
    if !path.is_file() {
      return Err(ViteError::ManifestNotFound {
        path: path.to_path_buf(),
      });
    }

    let content = fs::read_to_string(path).map_err(|source| ViteError::Io {
      path: path.to_path_buf(),
      source,
    })?;
    let manifest: Manifest =
      serde_json::from_str(&content).map_err(|source| ViteError::ManifestInvalid {
        path: path.to_path_buf(),
        source,
      })?;

    debug!(path = %path.display(), chunks = manifest.len(), "loaded vite manifest");
    Ok(manifest)
  }

  /// Fetch the chunk for `entry`, failing when the key is absent.
  pub fn chunk(&self, entry: &str) -> Result<&Chunk> {
    self
      .chunks
      .get(entry)
      .ok_or_else(|| ViteError::entry_not_found(entry))
  }

  /// Fetch the chunk for `entry` if present.
  pub fn get(&self, entry: &str) -> Option<&Chunk> {
    self.chunks.get(entry)
  }

  /// First key (in manifest order) whose chunk compiled to `file`.
  ///
  /// Several entry points may emit the same stylesheet; the first key always wins so the
  /// identifier handed to attribute resolvers is stable for a given manifest.
  pub fn find_by_file(&self, file: &str) -> Option<(&str, &Chunk)> {
    self
      .chunks
      .iter()
      .find(|(_, chunk)| chunk.file == file)
      .map(|(key, chunk)| (key.as_str(), chunk))
  }

  /// Iterate over `(key, chunk)` pairs in manifest order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &Chunk)> {
    self.chunks.iter().map(|(key, chunk)| (key.as_str(), chunk))
  }

  /// Number of chunks in the manifest.
  pub fn len(&self) -> usize {
    self.chunks.len()
  }

  /// Returns `true` when the manifest holds no chunks.
  pub fn is_empty(&self) -> bool {
    self.chunks.is_empty()
  }
}

impl<K: Into<String>> FromIterator<(K, Chunk)> for Manifest {
  fn from_iter<T: IntoIterator<Item = (K, Chunk)>>(iter: T) -> Self {
    Self {
      chunks: iter
        .into_iter()
        .map(|(key, chunk)| (key.into(), chunk))
        .collect(),
    }
  }
}
