//! Boolean condition trees
//!
//! A condition tree serializes into the `WHERE` clause of a query. The
//! parenthesization rules here determine operator precedence in the emitted
//! text and must hold exactly: `And`/`Or` with a single surviving child
//! collapse to the child's own text, while `Group` always parenthesizes.

use crate::operators::Operator;

/// How a condition value is interpreted during serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Escaped as a literal value
    #[default]
    Literal,
    /// Rendered as a `[field]` reference to another field
    FieldReference,
}

/// A condition value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    /// Value list for membership operators
    List(Vec<FieldValue>),
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        Self::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        Self::List(values.into_iter().map(FieldValue::from).collect())
    }
}

impl From<Vec<i64>> for FieldValue {
    fn from(values: Vec<i64>) -> Self {
        Self::List(values.into_iter().map(FieldValue::from).collect())
    }
}

impl FieldValue {
    /// Escape a scalar for query text.
    ///
    /// Priority: numerics and booleans render unquoted; a field reference
    /// renders as `[value]`; a string starting with the `@` macro sentinel
    /// renders verbatim; anything else is single-quoted with embedded quotes
    /// doubled.
    fn escape(&self, kind: ValueKind) -> String {
        match self {
            Self::Integer(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::String(s) => {
                if kind == ValueKind::FieldReference {
                    format!("[{s}]")
                } else if s.starts_with('@') {
                    s.clone()
                } else {
                    format!("'{}'", s.replace('\'', "''"))
                }
            }
            Self::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.escape(kind)).collect();
                format!("({})", parts.join(", "))
            }
        }
    }
}

/// A single `[field] operator value` condition
#[derive(Debug, Clone, PartialEq)]
pub struct FieldCondition {
    pub field: String,
    pub operator: Operator,
    pub value: FieldValue,
    pub kind: ValueKind,
}

impl FieldCondition {
    pub fn new(field: impl Into<String>, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            kind: ValueKind::Literal,
        }
    }

    /// Compare against another field instead of a literal value
    pub fn field_ref(field: impl Into<String>, operator: Operator, other: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            operator,
            value: FieldValue::String(other.into()),
            kind: ValueKind::FieldReference,
        }
    }

    pub fn to_wiql(&self) -> String {
        let value = if self.operator.is_membership() {
            // Membership always renders a parenthesized list, one element for
            // a scalar value.
            match &self.value {
                FieldValue::List(_) => self.value.escape(self.kind),
                scalar => format!("({})", scalar.escape(self.kind)),
            }
        } else {
            self.value.escape(self.kind)
        };
        format!("[{}] {} {}", self.field, self.operator.as_str(), value)
    }
}

/// A boolean condition tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Condition {
    /// Renders as the empty string and is dropped by logical parents
    #[default]
    Empty,
    Field(FieldCondition),
    And(Vec<Condition>),
    Or(Vec<Condition>),
    /// Always parenthesized, even around a single child
    Group(Box<Condition>),
}

impl Condition {
    pub fn field(field: impl Into<String>, operator: Operator, value: impl Into<FieldValue>) -> Self {
        Self::Field(FieldCondition::new(field, operator, value))
    }

    pub fn and(children: Vec<Condition>) -> Self {
        Self::And(children)
    }

    pub fn or(children: Vec<Condition>) -> Self {
        Self::Or(children)
    }

    pub fn group(inner: Condition) -> Self {
        Self::Group(Box::new(inner))
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Serialize the tree into query text.
    pub fn to_wiql(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Field(condition) => condition.to_wiql(),
            Self::And(children) => Self::join(children, " AND "),
            Self::Or(children) => Self::join(children, " OR "),
            Self::Group(inner) => format!("({})", inner.to_wiql()),
        }
    }

    /// Render children, drop empty renderings, and only parenthesize when two
    /// or more survive. A lone survivor keeps its own text unchanged.
    fn join(children: &[Condition], connective: &str) -> String {
        let mut parts: Vec<String> = children
            .iter()
            .map(Condition::to_wiql)
            .filter(|text| !text.is_empty())
            .collect();
        match parts.len() {
            0 => String::new(),
            1 => parts.remove(0),
            _ => format!("({})", parts.join(connective)),
        }
    }
}
