//! Ordered HTML attribute maps and their string serialisation.

use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Value of a single HTML attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
  /// Rendered as `name="value"`.
  Text(String),
  /// `true` renders the bare attribute name, `false` omits it.
  Flag(bool),
  /// Never rendered.
  Null,
}

impl AttributeValue {
  /// Convert a JSON value taken from a manifest chunk or an options file.
  pub fn from_json(value: &Value) -> Self {
    match value {
      Value::String(text) => Self::Text(text.clone()),
      Value::Bool(flag) => Self::Flag(*flag),
      Value::Null => Self::Null,
      other => Self::Text(other.to_string()),
    }
  }

  fn is_rendered(&self) -> bool {
    !matches!(self, Self::Flag(false) | Self::Null)
  }
}

impl From<&str> for AttributeValue {
  fn from(value: &str) -> Self {
    Self::Text(value.to_string())
  }
}

impl From<String> for AttributeValue {
  fn from(value: String) -> Self {
    Self::Text(value)
  }
}

impl From<&String> for AttributeValue {
  fn from(value: &String) -> Self {
    Self::Text(value.clone())
  }
}

impl From<bool> for AttributeValue {
  fn from(value: bool) -> Self {
    Self::Flag(value)
  }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
  fn from(value: Option<T>) -> Self {
    value.map_or(Self::Null, Into::into)
  }
}

/// Attribute map preserving insertion order.
///
/// Merging follows "later wins": a key that already exists keeps its position but takes the
/// new value, and unseen keys are appended.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagAttributes(IndexMap<String, AttributeValue>);

impl TagAttributes {
  /// Empty attribute map.
  pub fn new() -> Self {
    Self::default()
  }

  /// Builder-style insert.
  pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
    self.insert(name, value);
    self
  }

  /// Insert or overwrite an attribute.
  pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
    self.0.insert(name.into(), value.into());
  }

  /// Look up an attribute by name.
  pub fn get(&self, name: &str) -> Option<&AttributeValue> {
    self.0.get(name)
  }

  /// Number of attributes, rendered or not.
  pub fn len(&self) -> usize {
    self.0.len()
  }

  /// Returns `true` when no attributes are set.
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  /// Shallow-merge `other` over `self`.
  pub fn merge(&mut self, other: TagAttributes) {
    for (name, value) in other.0 {
      self.0.insert(name, value);
    }
  }

  /// Build a map from a JSON object, converting each value with [`AttributeValue::from_json`].
  pub fn from_json_object(object: &Map<String, Value>) -> Self {
    object
      .iter()
      .map(|(name, value)| (name.clone(), AttributeValue::from_json(value)))
      .collect()
  }

  /// Serialise to the space-separated form placed inside a tag.
  ///
  /// Values are written verbatim; escaping is the caller's responsibility.
  pub fn render(&self) -> String {
    self
      .0
      .iter()
      .filter(|(_, value)| value.is_rendered())
      .map(|(name, value)| match value {
        AttributeValue::Text(text) => format!("{name}=\"{text}\""),
        _ => name.clone(),
      })
      .collect::<Vec<_>>()
      .join(" ")
  }
}

impl<K: Into<String>, V: Into<AttributeValue>> FromIterator<(K, V)> for TagAttributes {
  fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
    Self(
      iter
        .into_iter()
        .map(|(name, value)| (name.into(), value.into()))
        .collect(),
    )
  }
}

impl IntoIterator for TagAttributes {
  type Item = (String, AttributeValue);
  type IntoIter = indexmap::map::IntoIter<String, AttributeValue>;

  fn into_iter(self) -> Self::IntoIter {
    self.0.into_iter()
  }
}
