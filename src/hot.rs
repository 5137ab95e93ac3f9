//! Detection of a running Vite dev server through its `hot` sentinel file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, ViteError};

/// Sentinel file written by the Vite dev server plugin while it is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotFile {
  path: PathBuf,
}

impl HotFile {
  /// Watch the given sentinel path.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Location of the sentinel file.
  pub fn path(&self) -> &Path {
    &self.path
  }

  /// The dev server is considered running whenever the file exists, even if it is empty.
  pub fn is_running_hot(&self) -> bool {
    self.path.is_file()
  }

  /// Dev server origin read from the sentinel, trailing whitespace removed.
  pub fn base_url(&self) -> Result<String> {
    let contents = fs::read_to_string(&self.path).map_err(|source| ViteError::Io {
      path: self.path.clone(),
      source,
    })?;
    Ok(contents.trim_end().to_string())
  }

  /// URL of `path` on the dev server.
  pub fn asset_url(&self, path: &str) -> Result<String> {
    Ok(format!("{}/{}", self.base_url()?, path))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn absent_file_is_not_hot() {
    let dir = tempdir().unwrap();
    let hot = HotFile::new(dir.path().join("hot"));
    assert!(!hot.is_running_hot());
    assert!(matches!(hot.base_url().unwrap_err(), ViteError::Io { .. }));
  }

  #[test]
  fn directory_is_not_hot() {
    let dir = tempdir().unwrap();
    assert!(!HotFile::new(dir.path()).is_running_hot());
  }

  #[test]
  fn trims_trailing_newline_from_base_url() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hot");
    fs::write(&path, "http://localhost:5173\n").unwrap();

    let hot = HotFile::new(&path);
    assert!(hot.is_running_hot());
    assert_eq!(hot.base_url().unwrap(), "http://localhost:5173");
    assert_eq!(
      hot.asset_url("resources/js/app.js").unwrap(),
      "http://localhost:5173/resources/js/app.js"
    );
  }

  #[test]
  fn empty_file_still_toggles_hot_mode() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hot");
    fs::write(&path, "").unwrap();

    let hot = HotFile::new(path);
    assert!(hot.is_running_hot());
    assert_eq!(hot.asset_url("app.js").unwrap(), "/app.js");
  }
}
