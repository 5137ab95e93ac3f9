//! Manifest traversal and tag generation for Vite entry points.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::attributes::{AttributeValue, TagAttributes};
use crate::builder::ViteBuilder;
use crate::config::{
  DEFAULT_BUILD_DIR, DEFAULT_INTEGRITY_KEY, DEFAULT_MANIFEST_FILENAME, DEFAULT_PUBLIC_DIR,
};
use crate::error::Result;
use crate::hot::HotFile;
use crate::manifest::{Chunk, Manifest};
use crate::resolvers::{AssetContext, AttributeResolver, PathResolver};
use crate::tags::{TagKind, TagList};

const HOT_CLIENT: &str = "@vite/client";

/// Resolves manifest entries into HTML tags and asset URLs.
///
/// Instances are immutable once built; construct one with [`Vite::builder`] and share it freely.
#[derive(Debug, Clone)]
pub struct Vite {
  pub(crate) nonce: Option<String>,
  pub(crate) hotfile: Option<PathBuf>,
  pub(crate) build_dir: String,
  pub(crate) public_dir: PathBuf,
  pub(crate) manifest_filename: String,
  pub(crate) integrity_key: Option<String>,
  pub(crate) script_tag_attributes_resolvers: Vec<AttributeResolver>,
  pub(crate) style_tag_attributes_resolvers: Vec<AttributeResolver>,
  pub(crate) asset_path_resolver: Option<PathResolver>,
}

impl Default for Vite {
  fn default() -> Self {
    Self {
      nonce: None,
      hotfile: None,
      build_dir: DEFAULT_BUILD_DIR.into(),
      public_dir: PathBuf::from(DEFAULT_PUBLIC_DIR),
      manifest_filename: DEFAULT_MANIFEST_FILENAME.into(),
      integrity_key: Some(DEFAULT_INTEGRITY_KEY.into()),
      script_tag_attributes_resolvers: Vec::new(),
      style_tag_attributes_resolvers: Vec::new(),
      asset_path_resolver: None,
    }
  }
}

impl Vite {
  /// Start configuring a resolver from the defaults.
  pub fn builder() -> ViteBuilder {
    ViteBuilder::new()
  }

  /// Render the tags needed to load `entries`.
  ///
  /// `build_dir` overrides the configured build directory for this call only. Stylesheets are
  /// emitted before scripts and every tag appears at most once. While the dev server is running
  /// the manifest is not read; the `@vite/client` script and each entry are loaded from it.
  pub fn render<I, S>(&self, entries: I, build_dir: Option<&str>) -> Result<String>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let build_dir = build_dir.unwrap_or(&self.build_dir);

    if self.is_running_hot() {
      return self.render_hot(entries);
    }

    let manifest = self.manifest_contents(build_dir)?;
    let context = AssetContext::new();
    let mut tags = TagList::new();
    let mut entry_count = 0usize;

    for entry in entries {
      let entry = entry.as_ref();
      entry_count += 1;
      let chunk = manifest.chunk(entry)?;

      for import in &chunk.imports {
        for css in &manifest.chunk(import)?.css {
          tags.push(self.css_tag(&manifest, build_dir, css));
        }
      }

      let url = self.asset_path(&format!("{build_dir}/{}", chunk.file), &context);
      tags.push(self.make_tag_for_chunk(entry, &url, Some(chunk), &manifest));

      for css in &chunk.css {
        tags.push(self.css_tag(&manifest, build_dir, css));
      }
    }

    debug!(entries = entry_count, tags = tags.len(), "rendered vite tags");
    Ok(tags.finish())
  }

  /// URL of a single manifest entry, or of `path` on the dev server when running hot.
  ///
  /// `context` is handed to the asset path resolver unchanged.
  pub fn asset(&self, path: &str, build_dir: Option<&str>, context: &AssetContext) -> Result<String> {
    if self.is_running_hot() {
      return self.hot_file().asset_url(path);
    }

    let build_dir = build_dir.unwrap_or(&self.build_dir);
    let manifest = self.manifest_contents(build_dir)?;
    let chunk = manifest.chunk(path)?;

    Ok(self.asset_path(&format!("{build_dir}/{}", chunk.file), context))
  }

  /// Whether the dev server sentinel file exists.
  pub fn is_running_hot(&self) -> bool {
    let running = self.hot_file().is_running_hot();
    if running {
      debug!(hotfile = %self.hotfile().display(), "vite dev server detected");
    }
    running
  }

  /// Configured sentinel path, defaulting to `{public_dir}/hot`.
  pub fn hotfile(&self) -> PathBuf {
    self
      .hotfile
      .clone()
      .unwrap_or_else(|| self.public_dir.join("hot"))
  }

  /// Nonce added to every tag, if any.
  pub fn nonce(&self) -> Option<&str> {
    self.nonce.as_deref()
  }

  /// Default build directory.
  pub fn build_dir(&self) -> &str {
    &self.build_dir
  }

  /// Directory the manifest and hot file live under.
  pub fn public_dir(&self) -> &Path {
    &self.public_dir
  }

  /// Manifest field holding the integrity hash, `None` when integrity is disabled.
  pub fn integrity_key(&self) -> Option<&str> {
    self.integrity_key.as_deref()
  }

  /// Location of the manifest for `build_dir` (or the default build directory).
  pub fn manifest_path(&self, build_dir: Option<&str>) -> PathBuf {
    self
      .public_dir
      .join(build_dir.unwrap_or(&self.build_dir))
      .join(".vite")
      .join(&self.manifest_filename)
  }

  fn hot_file(&self) -> HotFile {
    HotFile::new(self.hotfile())
  }

  fn manifest_contents(&self, build_dir: &str) -> Result<Manifest> {
    Manifest::load(&self.manifest_path(Some(build_dir)))
  }

  fn render_hot<I, S>(&self, entries: I) -> Result<String>
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let hot = self.hot_file();
    let base_url = hot.base_url()?;
    let manifest = Manifest::default();
    let mut tags = TagList::new();

    let client_url = format!("{base_url}/{HOT_CLIENT}");
    tags.push(self.make_tag_for_chunk(HOT_CLIENT, &client_url, None, &manifest));

    for entry in entries {
      let entry = entry.as_ref();
      let url = format!("{base_url}/{entry}");
      tags.push(self.make_tag_for_chunk(entry, &url, None, &manifest));
    }

    debug!(tags = tags.len(), base_url = %base_url, "rendered vite dev server tags");
    Ok(tags.finish())
  }

  fn css_tag(&self, manifest: &Manifest, build_dir: &str, css: &str) -> String {
    let url = self.asset_path(&format!("{build_dir}/{css}"), &AssetContext::new());
    match manifest.find_by_file(css) {
      Some((key, chunk)) => self.make_tag_for_chunk(key, &url, Some(chunk), manifest),
      None => self.make_tag_for_chunk(css, &url, None, manifest),
    }
  }

  fn make_tag_for_chunk(
    &self,
    key: &str,
    url: &str,
    chunk: Option<&Chunk>,
    manifest: &Manifest,
  ) -> String {
    let kind = TagKind::for_url(url);
    let integrity = self.integrity_for(chunk);

    let tag = if self.nonce.is_none()
      && integrity.is_none()
      && self.script_tag_attributes_resolvers.is_empty()
      && self.style_tag_attributes_resolvers.is_empty()
    {
      kind.render(url, None, TagAttributes::new())
    } else {
      let attributes = self.resolve_tag_attributes(kind, key, url, chunk, manifest, integrity);
      kind.render(url, self.nonce(), attributes)
    };

    trace!(key, tag = tag.trim_end(), "generated tag");
    tag
  }

  fn resolve_tag_attributes(
    &self,
    kind: TagKind,
    key: &str,
    url: &str,
    chunk: Option<&Chunk>,
    manifest: &Manifest,
    integrity: Option<AttributeValue>,
  ) -> TagAttributes {
    let mut attributes = TagAttributes::new();
    if self.integrity_key.is_some() {
      attributes.insert("integrity", integrity.unwrap_or(AttributeValue::Flag(false)));
    }

    let resolvers = match kind {
      TagKind::Stylesheet => &self.style_tag_attributes_resolvers,
      TagKind::Script => &self.script_tag_attributes_resolvers,
    };
    for resolver in resolvers {
      attributes.merge(resolver.resolve(key, url, chunk, manifest));
    }

    attributes
  }

  fn integrity_for(&self, chunk: Option<&Chunk>) -> Option<AttributeValue> {
    let key = self.integrity_key.as_deref()?;
    chunk?
      .field(key)
      .map(|value| AttributeValue::from_json(&value))
  }

  fn asset_path(&self, path: &str, context: &AssetContext) -> String {
    match &self.asset_path_resolver {
      Some(resolver) => resolver.resolve(path, context),
      None => path.to_string(),
    }
  }
}
