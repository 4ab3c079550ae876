use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Key-ordered mapping node.
///
/// Insertion order is preserved so output is deterministic; equality ignores
/// order.
pub type Mapping = IndexMap<String, Document>;

/// An immutable JSON-like tree.
///
/// Every node is exactly one of a scalar, an ordered sequence, or a mapping.
/// Comparison code dispatches on the tag instead of probing runtime types.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum Document {
    /// A leaf value.
    Scalar(Scalar),
    /// An ordered list of child documents.
    Sequence(Vec<Document>),
    /// String-keyed child documents.
    Mapping(Mapping),
}

/// Leaf value of a [`Document`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

/// The shape of a document node, without its contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Scalar,
    Sequence,
    Mapping,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => write!(f, "scalar"),
            Self::Sequence => write!(f, "sequence"),
            Self::Mapping => write!(f, "mapping"),
        }
    }
}

impl Document {
    /// The null scalar.
    pub const fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Which of the three node shapes this is.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Self::Scalar(_) => DocumentKind::Scalar,
            Self::Sequence(_) => DocumentKind::Sequence,
            Self::Mapping(_) => DocumentKind::Mapping,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Document]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Scalar::Null))
    }

    /// Look up a direct child of a mapping node.
    pub fn get(&self, key: &str) -> Option<&Document> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Walk nested mappings along `path`.
    ///
    /// Returns `None` as soon as a segment is missing or a non-mapping node is
    /// reached.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&Document> {
        path.iter()
            .try_fold(self, |node, segment| node.get(segment.as_ref()))
    }

    /// Walk nested mappings along a dotted path such as `order.referenceNumber`.
    pub fn lookup(&self, dotted: &str) -> Option<&Document> {
        let segments: Vec<&str> = dotted.split('.').collect();
        self.get_path(&segments)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::null()
    }
}

/// Strings print raw; everything else prints as compact JSON.
impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(Scalar::String(s)) => f.write_str(s),
            other => write!(f, "{}", Value::from(other.clone())),
        }
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Scalar(Scalar::Null),
            Value::Bool(b) => Self::Scalar(Scalar::Bool(b)),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Document::from).collect()),
            Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Document::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        match doc {
            Document::Scalar(Scalar::Null) => Value::Null,
            Document::Scalar(Scalar::Bool(b)) => Value::Bool(b),
            Document::Scalar(Scalar::Number(n)) => Value::Number(n),
            Document::Scalar(Scalar::String(s)) => Value::String(s),
            Document::Sequence(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            Document::Mapping(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<Mapping> for Document {
    fn from(map: Mapping) -> Self {
        Self::Mapping(map)
    }
}

impl From<Vec<Document>> for Document {
    fn from(items: Vec<Document>) -> Self {
        Self::Sequence(items)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Document {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Document {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Document {
    fn from(n: i64) -> Self {
        Self::Scalar(Scalar::Number(n.into()))
    }
}
