//! Generic request model for resource operations.
//!
//! A [`Request`] is database-agnostic: it names columns, never tables, and
//! carries [`RequestValue`] entries that pair a column name with an
//! [`Operator`] and a [`Scalar`] value. The statement builder resolves the
//! names against resource metadata and renders them per dialect.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of statement a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    #[default]
    Select,
    Insert,
    Update,
    Delete,
}

/// Comparison operator carried by a [`RequestValue`].
///
/// `Escaped` marks a value that was backslash-escaped during request parsing;
/// it must be resolved to a concrete operator before rendering and is rejected
/// if it reaches the builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    In,
    IsNull,
    IsNotNull,
    LessThan,
    LessThanOrEqualTo,
    GreaterThan,
    GreaterThanOrEqualTo,
    NotEquals,
    Escaped,
}

/// A scalar-or-null request value.
///
/// Values arrive from an external protocol as text or JSON; numeric columns
/// coerce text via [`ColumnMetaData::normalize_value`](crate::metadata::ColumnMetaData::normalize_value)
/// before rendering.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// The text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True when the value is text containing a `%` wildcard.
    pub fn contains_wildcard(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.contains('%'))
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => f.write_str("NULL"),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Text(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Text(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Int(i64::from(i))
    }
}

impl From<f64> for Scalar {
    fn from(x: f64) -> Self {
        Scalar::Float(x)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Scalar::Null,
        }
    }
}

impl From<serde_json::Value> for Scalar {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Scalar::Null,
            serde_json::Value::Bool(b) => Scalar::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Scalar::Int(i)
                } else if let Some(x) = n.as_f64() {
                    Scalar::Float(x)
                } else {
                    Scalar::Text(n.to_string())
                }
            }
            serde_json::Value::String(s) => Scalar::Text(s),
            other => Scalar::Text(other.to_string()),
        }
    }
}

/// A named value used as a row selector, filter, or write target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestValue {
    /// Column name to resolve against resource metadata.
    pub name: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: Scalar,
    /// Element list for the `In` operator, in request order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_values: Vec<Scalar>,
}

impl RequestValue {
    pub fn new(name: impl Into<String>, operator: Operator, value: impl Into<Scalar>) -> Self {
        Self {
            name: name.into(),
            operator,
            value: value.into(),
            in_values: Vec::new(),
        }
    }

    /// Equality selector; promoted to LIKE when the value contains `%`.
    pub fn eq(name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self::new(name, Operator::Equals, value)
    }

    pub fn in_list(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            operator: Operator::In,
            value: Scalar::Null,
            in_values: values,
        }
    }

    pub fn is_null(name: impl Into<String>) -> Self {
        Self::new(name, Operator::IsNull, Scalar::Null)
    }

    pub fn is_not_null(name: impl Into<String>) -> Self {
        Self::new(name, Operator::IsNotNull, Scalar::Null)
    }
}

/// A generic resource request.
///
/// Resource identifiers select rows by primary key; parameters add filters or
/// write targets. Both lists keep request order, and identifiers are always
/// processed before parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    pub kind: RequestKind,
    #[serde(default)]
    pub resource_identifiers: Vec<RequestValue>,
    #[serde(default)]
    pub parameters: Vec<RequestValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_offset: Option<u32>,
}

impl Request {
    pub fn new(kind: RequestKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn select() -> Self {
        Self::new(RequestKind::Select)
    }

    pub fn insert() -> Self {
        Self::new(RequestKind::Insert)
    }

    pub fn update() -> Self {
        Self::new(RequestKind::Update)
    }

    pub fn delete() -> Self {
        Self::new(RequestKind::Delete)
    }

    /// Append a resource identifier.
    pub fn identifier(mut self, value: RequestValue) -> Self {
        self.resource_identifiers.push(value);
        self
    }

    /// Append a filter or write-target parameter.
    pub fn parameter(mut self, value: RequestValue) -> Self {
        self.parameters.push(value);
        self
    }

    pub fn limit(mut self, limit: u32, offset: u32) -> Self {
        self.select_limit = Some(limit);
        self.select_offset = Some(offset);
        self
    }
}
