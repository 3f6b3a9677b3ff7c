use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Child values of an object node, keyed by attribute name.
pub type Fields = BTreeMap<String, ValueNode>;

/// Dotted location of an attribute, e.g. `single_nested_val.string_val`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct AttributePath(Vec<String>);

impl AttributePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.0.clone();
        segments.push(name.to_string());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> From<&[S]> for AttributePath {
    fn from(segments: &[S]) -> Self {
        Self(segments.iter().map(|s| s.as_ref().to_string()).collect())
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        f.write_str(&self.0.join("."))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValueError {
    #[error("unsupported JSON {found} at {path}; only strings, objects and null are allowed")]
    UnsupportedType { path: AttributePath, found: &'static str },

    #[error("invalid unknown mask at {path}: expected true, false, null or an object")]
    InvalidUnknownMask { path: AttributePath },
}

/// A plan, prior-state or resulting-state value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ValueNode {
    #[default]
    Null,
    /// Not known until apply (computed, or derived from other unknowns).
    Unknown,
    Scalar(String),
    Object(Fields),
}

impl ValueNode {
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, ValueNode)>,
        K: Into<String>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Fields> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&ValueNode> {
        self.as_object().and_then(|fields| fields.get(name))
    }

    /// Walks `path` through nested objects.
    pub fn at<S: AsRef<str>>(&self, path: &[S]) -> Option<&ValueNode> {
        path.iter()
            .try_fold(self, |node, segment| node.get(segment.as_ref()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Unknown => "unknown",
            Self::Scalar(_) => "string",
            Self::Object(_) => "object",
        }
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValueError> {
        from_json_at(value, &AttributePath::root())
    }

    /// Builds a node from a Terraform-style `after` / `after_unknown` pair:
    /// every position where `mask` is `true` becomes [`ValueNode::Unknown`].
    pub fn from_json_with_unknowns(
        value: &serde_json::Value,
        mask: &serde_json::Value,
    ) -> Result<Self, ValueError> {
        apply_mask(value, mask, &AttributePath::root())
    }

    /// Unknown has no JSON form and renders as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null | Self::Unknown => serde_json::Value::Null,
            Self::Scalar(s) => serde_json::Value::String(s.clone()),
            Self::Object(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(name, node)| (name.clone(), node.to_json()))
                    .collect(),
            ),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

fn from_json_at(value: &serde_json::Value, path: &AttributePath) -> Result<ValueNode, ValueError> {
    match value {
        serde_json::Value::Null => Ok(ValueNode::Null),
        serde_json::Value::String(s) => Ok(ValueNode::Scalar(s.clone())),
        serde_json::Value::Object(map) => {
            let mut fields = Fields::new();
            for (name, child) in map {
                fields.insert(name.clone(), from_json_at(child, &path.child(name))?);
            }
            Ok(ValueNode::Object(fields))
        }
        other => Err(ValueError::UnsupportedType {
            path: path.clone(),
            found: json_kind(other),
        }),
    }
}

fn apply_mask(
    value: &serde_json::Value,
    mask: &serde_json::Value,
    path: &AttributePath,
) -> Result<ValueNode, ValueError> {
    match mask {
        serde_json::Value::Bool(true) => Ok(ValueNode::Unknown),
        serde_json::Value::Bool(false) | serde_json::Value::Null => from_json_at(value, path),
        serde_json::Value::Object(mask_map) => {
            let serde_json::Value::Object(map) = value else {
                return from_json_at(value, path);
            };

            let mut fields = Fields::new();
            for (name, child) in map {
                let child_mask = mask_map.get(name).unwrap_or(&serde_json::Value::Null);
                fields.insert(name.clone(), apply_mask(child, child_mask, &path.child(name))?);
            }
            // Terraform leaves unknown attributes out of `after` entirely.
            for (name, child_mask) in mask_map {
                if !map.contains_key(name) && *child_mask == serde_json::Value::Bool(true) {
                    fields.insert(name.clone(), ValueNode::Unknown);
                }
            }
            Ok(ValueNode::Object(fields))
        }
        _ => Err(ValueError::InvalidUnknownMask { path: path.clone() }),
    }
}

impl Serialize for ValueNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ValueNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        ValueNode::from_json(&value).map_err(serde::de::Error::custom)
    }
}
