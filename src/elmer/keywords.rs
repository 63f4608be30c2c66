use serde::{Deserialize, Serialize};
use std::fmt;

/// Defines the value of a keyword in an Elmer solver input file
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Logical(bool),

    /// Text written verbatim; quotes must be included when Elmer expects a string
    ///
    /// Example: `"HeatSolve" "HeatSolver"` for a procedure or `Cartesian 2D` for a coordinate system.
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{:?}", v),
            Value::Logical(true) => write!(f, "True"),
            Value::Logical(false) => write!(f, "False"),
            Value::Text(v) => write!(f, "{}", v),
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Integer(v as i64)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Logical(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

/// Holds keyword-value pairs of a section, in insertion order
///
/// Elmer keywords are case-insensitive; setting an existing keyword replaces its value.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Keywords {
    all: Vec<(String, Value)>,
}

impl Keywords {
    /// Allocates a new (empty) instance
    pub fn new() -> Self {
        Keywords { all: Vec::new() }
    }

    /// Allocates a new instance from an array of pairs
    pub fn from<const N: usize>(arr: [(&str, Value); N]) -> Self {
        let mut keywords = Keywords::new();
        for (key, value) in arr {
            keywords.set(key, value);
        }
        keywords
    }

    /// Sets (or replaces) a keyword
    pub fn set<V>(&mut self, key: &str, value: V) -> &mut Self
    where
        V: Into<Value>,
    {
        let value = value.into();
        match self.all.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value,
            None => self.all.push((key.to_string(), value)),
        }
        self
    }

    /// Returns the value of a keyword
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.all.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)).map(|(_, v)| v)
    }

    /// Returns the number of keywords
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Indicates whether there are no keywords
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Returns an iterator over the pairs
    pub fn iter(&self) -> impl Iterator<Item = &(String, Value)> {
        self.all.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
