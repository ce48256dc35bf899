use std::{fmt, fmt::Write as _, fs, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::{
    error::{FieldFault, NarrativeError, NarrativeResult},
    path::FieldPath,
};

/// Shape of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A single string.
    Scalar,
    /// An ordered list of strings.
    Sequence,
    /// An ordered map of named child nodes.
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Sequence => write!(f, "sequence"),
            Self::Map => write!(f, "map"),
        }
    }
}

/// Recursive scenario data: a string, a list of strings, or an ordered map.
///
/// Maps preserve insertion order, so traversal is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum ScenarioTree {
    /// Leaf string.
    Scalar(String),
    /// Ordered list of leaf strings.
    Sequence(Vec<String>),
    /// Named children in insertion order.
    Map(IndexMap<String, ScenarioTree>),
}

impl ScenarioTree {
    /// Leaf string node.
    #[must_use]
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Sequence node from any iterator of strings.
    #[must_use]
    pub fn sequence<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }

    /// Map node from `(key, child)` pairs; later duplicates replace earlier ones in place.
    #[must_use]
    pub fn map<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Shape of this node.
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Map(_) => NodeKind::Map,
        }
    }

    /// Scalar value, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Sequence items, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[String]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Children, if this is a map.
    #[must_use]
    pub const fn as_map(&self) -> Option<&IndexMap<String, Self>> {
        match self {
            Self::Map(children) => Some(children),
            _ => None,
        }
    }

    /// Node at `path` below this one. Only maps can be descended into.
    pub fn resolve(&self, path: &FieldPath) -> Result<&Self, FieldFault> {
        match self {
            Self::Map(children) => resolve_in(children, path),
            other => Err(FieldFault::Kind {
                path: path.prefix(1),
                expected: NodeKind::Map,
                found: other.kind(),
            }),
        }
    }

    /// Like [`Self::resolve`], discarding the fault.
    #[must_use]
    pub fn get(&self, path: &FieldPath) -> Option<&Self> {
        self.resolve(path).ok()
    }

    /// Scalars plus sequence elements contained in this node.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Sequence(items) => items.len(),
            Self::Map(children) => children.values().map(Self::leaf_count).sum(),
        }
    }

    /// Nesting depth; leaves count as one level.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Scalar(_) | Self::Sequence(_) => 1,
            Self::Map(children) => 1 + children.values().map(Self::depth).max().unwrap_or(0),
        }
    }
}

impl Serialize for ScenarioTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => serializer.serialize_str(value),
            Self::Sequence(items) => items.serialize(serializer),
            Self::Map(children) => children.serialize(serializer),
        }
    }
}

impl TryFrom<Value> for ScenarioTree {
    type Error = NarrativeError;

    fn try_from(value: Value) -> NarrativeResult<Self> {
        from_value(value, &mut Vec::new())
    }
}

fn from_value(value: Value, at: &mut Vec<String>) -> NarrativeResult<ScenarioTree> {
    match value {
        Value::String(value) => Ok(ScenarioTree::Scalar(value)),
        Value::Array(items) => {
            let mut sequence = Vec::with_capacity(items.len());
            for (idx, item) in items.into_iter().enumerate() {
                match item {
                    Value::String(value) => sequence.push(value),
                    other => {
                        return Err(NarrativeError::UnsupportedLiteral {
                            path: location(at, Some(idx)),
                            found: json_type(&other),
                        })
                    }
                }
            }
            Ok(ScenarioTree::Sequence(sequence))
        }
        Value::Object(entries) => {
            let mut children = IndexMap::with_capacity(entries.len());
            for (key, child) in entries {
                if key.is_empty() || key.contains('.') {
                    return Err(NarrativeError::UnreachableKey {
                        path: location(at, None),
                        key,
                    });
                }
                at.push(key.clone());
                let node = from_value(child, at)?;
                at.pop();
                children.insert(key, node);
            }
            Ok(ScenarioTree::Map(children))
        }
        other => Err(NarrativeError::UnsupportedLiteral {
            path: location(at, None),
            found: json_type(&other),
        }),
    }
}

fn location(at: &[String], index: Option<usize>) -> String {
    let mut loc = if at.is_empty() {
        "$".to_string()
    } else {
        at.join(".")
    };
    if let Some(idx) = index {
        let _ = write!(loc, "[{idx}]");
    }
    loc
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn resolve_in<'a>(
    fields: &'a IndexMap<String, ScenarioTree>,
    path: &FieldPath,
) -> Result<&'a ScenarioTree, FieldFault> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(FieldFault::Missing(path.clone()));
    };
    let mut current = fields;
    for (idx, segment) in parents.iter().enumerate() {
        let node = current
            .get(segment)
            .ok_or_else(|| FieldFault::Missing(path.prefix(idx + 1)))?;
        match node {
            ScenarioTree::Map(children) => current = children,
            other => {
                return Err(FieldFault::Kind {
                    path: path.prefix(idx + 1),
                    expected: NodeKind::Map,
                    found: other.kind(),
                })
            }
        }
    }
    current
        .get(last)
        .ok_or_else(|| FieldFault::Missing(path.clone()))
}

macro_rules! field_document {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            fields: IndexMap<String, ScenarioTree>,
        }

        impl $name {
            /// Wraps an ordered field map as-is.
            #[must_use]
            pub const fn from_fields(fields: IndexMap<String, ScenarioTree>) -> Self {
                Self { fields }
            }

            /// Builds from a JSON literal whose root is an object.
            pub fn from_literal(value: Value) -> NarrativeResult<Self> {
                if !value.is_object() {
                    return Err(NarrativeError::UnsupportedLiteral {
                        path: "$".into(),
                        found: json_type(&value),
                    });
                }
                match ScenarioTree::try_from(value)? {
                    ScenarioTree::Map(fields) => Ok(Self { fields }),
                    other => Err(NarrativeError::UnsupportedLiteral {
                        path: "$".into(),
                        found: json_type(&serde_json::to_value(&other)?),
                    }),
                }
            }

            /// Builds from any typed record that serializes to strings, string
            /// lists, and nested records. `None` fields must be skipped.
            pub fn from_serializable<T: Serialize + ?Sized>(record: &T) -> NarrativeResult<Self> {
                Self::from_literal(serde_json::to_value(record)?)
            }

            /// Parses a JSON document.
            pub fn from_json_str(raw: &str) -> NarrativeResult<Self> {
                Self::from_literal(serde_json::from_str(raw)?)
            }

            /// Reads and parses a JSON file.
            pub fn from_json_file(path: impl AsRef<Path>) -> NarrativeResult<Self> {
                let raw = fs::read_to_string(path)?;
                Self::from_json_str(&raw)
            }

            /// Top-level fields in insertion order.
            #[must_use]
            pub const fn fields(&self) -> &IndexMap<String, ScenarioTree> {
                &self.fields
            }

            /// Node at `path`, or the fault explaining why it is unreachable.
            pub fn resolve(&self, path: &FieldPath) -> Result<&ScenarioTree, FieldFault> {
                resolve_in(&self.fields, path)
            }

            /// Node at `path`, if present.
            #[must_use]
            pub fn get(&self, path: &FieldPath) -> Option<&ScenarioTree> {
                self.resolve(path).ok()
            }

            /// Scalars plus sequence elements in the whole document.
            #[must_use]
            pub fn leaf_count(&self) -> usize {
                self.fields.values().map(ScenarioTree::leaf_count).sum()
            }

            /// Converts into a plain map node.
            #[must_use]
            pub fn into_tree(self) -> ScenarioTree {
                ScenarioTree::Map(self.fields)
            }

            /// JSON rendition preserving field order.
            pub fn to_json(&self) -> NarrativeResult<Value> {
                Ok(serde_json::to_value(&self.fields)?)
            }
        }
    };
}

field_document!(
    /// Static description of one case study, framework, or option set.
    ScenarioDefinition
);

field_document!(
    /// Tree returned by an advisor for a definition; opaque to the renderer.
    AnalysisResult
);

/// Builds a definition from a literal without transforming it.
pub fn build_definition(literal: Value) -> NarrativeResult<ScenarioDefinition> {
    ScenarioDefinition::from_literal(literal)
}
