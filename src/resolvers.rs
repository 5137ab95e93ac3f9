//! Pluggable attribute and asset path resolution.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::attributes::TagAttributes;
use crate::error::{Result, ViteError};
use crate::manifest::{Chunk, Manifest};

/// Caller supplied context forwarded to the [`PathResolver`] by [`crate::Vite::asset`].
pub type AssetContext = Map<String, Value>;

type AttributeFn = dyn Fn(&str, &str, Option<&Chunk>, &Manifest) -> TagAttributes + Send + Sync;
type PathFn = dyn Fn(&str, &AssetContext) -> String + Send + Sync;

/// Contributes extra attributes to each generated tag.
#[derive(Clone)]
pub enum AttributeResolver {
  /// Invoked with `(manifest_key, url, chunk, manifest)` for every tag.
  Callable(Arc<AttributeFn>),
  /// Fixed attributes applied to every tag.
  Static(TagAttributes),
}

impl AttributeResolver {
  /// Wrap a closure as a resolver.
  pub fn callable<F>(resolver: F) -> Self
  where
    F: Fn(&str, &str, Option<&Chunk>, &Manifest) -> TagAttributes + Send + Sync + 'static,
  {
    Self::Callable(Arc::new(resolver))
  }

  /// Produce this resolver's attributes for one tag.
  pub fn resolve(
    &self,
    key: &str,
    url: &str,
    chunk: Option<&Chunk>,
    manifest: &Manifest,
  ) -> TagAttributes {
    match self {
      Self::Callable(resolver) => resolver(key, url, chunk, manifest),
      Self::Static(attributes) => attributes.clone(),
    }
  }
}

impl From<TagAttributes> for AttributeResolver {
  fn from(attributes: TagAttributes) -> Self {
    Self::Static(attributes)
  }
}

impl fmt::Debug for AttributeResolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Callable(_) => f.write_str("Callable(..)"),
      Self::Static(attributes) => f.debug_tuple("Static").field(attributes).finish(),
    }
  }
}

/// Translate an option value from a JSON options file into resolvers.
///
/// A single object is one static resolver; an array registers each element in order and every
/// element must itself be an object.
pub fn normalize_resolvers(value: &Value) -> Result<Vec<AttributeResolver>> {
  match value {
    Value::Object(object) => Ok(vec![AttributeResolver::Static(
      TagAttributes::from_json_object(object),
    )]),
    Value::Array(items) => items
      .iter()
      .map(|item| match item {
        Value::Object(object) => Ok(AttributeResolver::Static(TagAttributes::from_json_object(
          object,
        ))),
        other => Err(ViteError::configuration(format!(
          "Each resolver array value must be a callable or an attribute array, got: {other}"
        ))),
      })
      .collect(),
    other => Err(ViteError::configuration(format!(
      "Resolver option must be a callable or an array of callables/attribute arrays, got: {other}"
    ))),
  }
}

/// Rewrites `{build_dir}/{file}` paths into served URLs (a CDN prefix, a versioned route, ...).
#[derive(Clone)]
pub struct PathResolver(Arc<PathFn>);

impl PathResolver {
  /// Wrap a closure as a path resolver.
  pub fn new<F>(resolver: F) -> Self
  where
    F: Fn(&str, &AssetContext) -> String + Send + Sync + 'static,
  {
    Self(Arc::new(resolver))
  }

  /// Resolve `path` using `context`.
  pub fn resolve(&self, path: &str, context: &AssetContext) -> String {
    (self.0)(path, context)
  }
}

impl fmt::Debug for PathResolver {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("PathResolver(..)")
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn static_resolver_ignores_arguments() {
    let resolver = AttributeResolver::from(TagAttributes::new().with("defer", true));
    let manifest = Manifest::default();

    let first = resolver.resolve("a.js", "build/a.js", None, &manifest);
    let second = resolver.resolve("b.js", "build/b.js", Some(&Chunk::new("b.js")), &manifest);
    assert_eq!(first, second);
    assert_eq!(first.render(), "defer");
  }

  #[test]
  fn callable_resolver_receives_key_url_and_chunk() {
    let resolver = AttributeResolver::callable(|key, url, chunk, _| {
      TagAttributes::new()
        .with("data-key", key)
        .with("data-url", url)
        .with("data-file", chunk.map(|c| c.file.clone()))
    });

    let attributes = resolver.resolve(
      "app.js",
      "build/app.1.js",
      Some(&Chunk::new("app.1.js")),
      &Manifest::default(),
    );
    assert_eq!(
      attributes.render(),
      "data-key=\"app.js\" data-url=\"build/app.1.js\" data-file=\"app.1.js\""
    );
  }

  #[test]
  fn normalizes_single_object_and_arrays() {
    let single = normalize_resolvers(&json!({ "defer": true })).unwrap();
    assert_eq!(single.len(), 1);

    let many = normalize_resolvers(&json!([{ "defer": true }, { "crossorigin": "anonymous" }]))
      .unwrap();
    assert_eq!(many.len(), 2);
    let manifest = Manifest::default();
    assert_eq!(
      many[1].resolve("k", "u", None, &manifest).render(),
      "crossorigin=\"anonymous\""
    );

    assert!(normalize_resolvers(&json!([])).unwrap().is_empty());
  }

  #[test]
  fn rejects_scalars_and_mixed_arrays() {
    let err = normalize_resolvers(&json!("defer")).unwrap_err();
    assert!(matches!(err, ViteError::Configuration(_)));

    let err = normalize_resolvers(&json!([{ "defer": true }, 42])).unwrap_err();
    assert!(matches!(err, ViteError::Configuration(ref message) if message.contains("42")));
  }

  #[test]
  fn path_resolver_forwards_context() {
    let resolver = PathResolver::new(|path, context| {
      match context.get("cdn").and_then(Value::as_str) {
        Some(cdn) => format!("{cdn}/{path}"),
        None => path.to_string(),
      }
    });

    let mut context = AssetContext::new();
    assert_eq!(resolver.resolve("build/app.js", &context), "build/app.js");
    context.insert("cdn".into(), json!("https://cdn.test"));
    assert_eq!(
      resolver.resolve("build/app.js", &context),
      "https://cdn.test/build/app.js"
    );
  }
}
