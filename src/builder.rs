//! Construction of [`Vite`] instances from explicit settings or an options file.

use std::path::PathBuf;

use tracing::debug;

use crate::config::{IntegrityKeyOption, ViteOptions};
use crate::error::{Result, ViteError};
use crate::resolvers::{AssetContext, AttributeResolver, PathResolver, normalize_resolvers};
use crate::util::random_str;
use crate::vite::Vite;

/// Length of nonces generated by [`ViteBuilder::generate_nonce`].
pub const GENERATED_NONCE_LENGTH: usize = 40;

#[derive(Debug, Clone, Default)]
enum NonceSetting {
  #[default]
  Unset,
  Fixed(String),
  Generate,
}

/// Collects settings and produces an immutable [`Vite`].
///
/// Resolver registration appends, so calling [`ViteBuilder::script_tag_attributes`] twice
/// registers two resolvers that are applied in that order.
#[derive(Debug, Clone, Default)]
pub struct ViteBuilder {
  vite: Vite,
  nonce: NonceSetting,
}

impl ViteBuilder {
  /// Builder seeded with the default layout (`public/build/.vite/manifest.json`).
  pub fn new() -> Self {
    Self::default()
  }

  /// Apply every option present in `options`, leaving the rest untouched.
  pub fn from_options(options: &ViteOptions) -> Result<Self> {
    Self::new().with_options(options)
  }

  /// Apply every option present in `options` on top of the current settings.
  pub fn with_options(mut self, options: &ViteOptions) -> Result<Self> {
    if let Some(hotfile) = &options.hotfile {
      self = self.hotfile(hotfile);
    }
    if let Some(build_dir) = &options.build_dir {
      self = self.build_dir(build_dir);
    }
    if let Some(public_dir) = &options.public_dir {
      self = self.public_dir(public_dir);
    }
    if let Some(manifest_filename) = &options.manifest_filename {
      self = self.manifest_filename(manifest_filename);
    }
    match &options.integrity_key {
      Some(IntegrityKeyOption::Key(key)) => self = self.integrity_key(key),
      Some(IntegrityKeyOption::Enabled(false)) => self = self.disable_integrity(),
      Some(IntegrityKeyOption::Enabled(true)) => {
        return Err(ViteError::configuration(
          "integrityKey must be a manifest field name or false",
        ));
      }
      None => {}
    }
    match &options.nonce {
      Some(Some(nonce)) => self = self.nonce(nonce),
      Some(None) => self = self.generate_nonce(),
      None => {}
    }
    if let Some(value) = &options.script_tag_attributes_resolvers {
      for resolver in normalize_resolvers(value)? {
        self = self.script_tag_attributes(resolver);
      }
    }
    if let Some(value) = &options.style_tag_attributes_resolvers {
      for resolver in normalize_resolvers(value)? {
        self = self.style_tag_attributes(resolver);
      }
    }

    Ok(self)
  }

  /// Rewrite every asset path through `resolver` before it is placed in a tag.
  pub fn asset_path_resolver<F>(mut self, resolver: F) -> Self
  where
    F: Fn(&str, &AssetContext) -> String + Send + Sync + 'static,
  {
    self.vite.asset_path_resolver = Some(PathResolver::new(resolver));
    self
  }

  /// Drop any configured asset path resolver.
  pub fn without_asset_path_resolver(mut self) -> Self {
    self.vite.asset_path_resolver = None;
    self
  }

  /// Override the dev server sentinel location.
  pub fn hotfile(mut self, path: impl Into<PathBuf>) -> Self {
    self.vite.hotfile = Some(path.into());
    self
  }

  /// Default build directory, relative to the public directory.
  pub fn build_dir(mut self, build_dir: impl Into<String>) -> Self {
    self.vite.build_dir = build_dir.into();
    self
  }

  /// Directory containing the build output and the hot file.
  pub fn public_dir(mut self, public_dir: impl Into<PathBuf>) -> Self {
    self.vite.public_dir = public_dir.into();
    self
  }

  /// Manifest file name inside `{build_dir}/.vite/`.
  pub fn manifest_filename(mut self, filename: impl Into<String>) -> Self {
    self.vite.manifest_filename = filename.into();
    self
  }

  /// Chunk field holding the subresource integrity hash.
  pub fn integrity_key(mut self, key: impl Into<String>) -> Self {
    self.vite.integrity_key = Some(key.into());
    self
  }

  /// Never emit `integrity`, even when chunks carry a hash.
  pub fn disable_integrity(mut self) -> Self {
    self.vite.integrity_key = None;
    self
  }

  /// Use a fixed nonce.
  pub fn nonce(mut self, nonce: impl Into<String>) -> Self {
    self.nonce = NonceSetting::Fixed(nonce.into());
    self
  }

  /// Generate a random nonce when [`ViteBuilder::build`] runs.
  pub fn generate_nonce(mut self) -> Self {
    self.nonce = NonceSetting::Generate;
    self
  }

  /// Register a resolver for `<script>` tags.
  pub fn script_tag_attributes(mut self, resolver: impl Into<AttributeResolver>) -> Self {
    self.vite.script_tag_attributes_resolvers.push(resolver.into());
    self
  }

  /// Register a resolver for `<link>` tags.
  pub fn style_tag_attributes(mut self, resolver: impl Into<AttributeResolver>) -> Self {
    self.vite.style_tag_attributes_resolvers.push(resolver.into());
    self
  }

  /// Finish configuration.
  pub fn build(self) -> Result<Vite> {
    let mut vite = self.vite;
    vite.nonce = match self.nonce {
      NonceSetting::Unset => None,
      NonceSetting::Fixed(nonce) => Some(nonce),
      NonceSetting::Generate => Some(random_str(GENERATED_NONCE_LENGTH)?),
    };

    debug!(
      public_dir = %vite.public_dir.display(),
      build_dir = %vite.build_dir,
      script_resolvers = vite.script_tag_attributes_resolvers.len(),
      style_resolvers = vite.style_tag_attributes_resolvers.len(),
      "configured vite resolver"
    );
    Ok(vite)
  }
}
