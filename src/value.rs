use indexmap::IndexMap;

use crate::datetime::Datetime;

/// An insertion-ordered TOML table.
///
/// Iteration follows the order keys appeared in the source. Equality does not
/// depend on order.
pub type Table = IndexMap<String, Value>;

/// A node of the parsed document tree.
///
/// # Examples
///
/// ```
/// use tomless::{Table, Value};
///
/// let mut server = Table::new();
/// server.insert("port".to_string(), Value::Integer(8080));
/// server.insert("hosts".to_string(), Value::Array(vec![Value::String("a".into())]));
///
/// let root = Value::Table(server);
/// assert_eq!(root.get("port").and_then(Value::as_integer), Some(8080));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 string with escapes already decoded
    String(String),

    /// Signed 64-bit integer
    Integer(i64),

    /// IEEE 754 double
    Float(f64),

    Boolean(bool),

    /// Calendar-validated date, time, or date-time
    Datetime(Datetime),

    /// Ordered values, element types may differ
    Array(Vec<Value>),

    Table(Table),
}

impl Value {
    /// Short lowercase name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Boolean(_) => "boolean",
            Value::Datetime(_) => "datetime",
            Value::Array(_) => "array",
            Value::Table(_) => "table",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&Datetime> {
        match self {
            Value::Datetime(dt) => Some(dt),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Value::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Value::Table(_))
    }

    /// Looks up `key` if this value is a table.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_table().and_then(|t| t.get(key))
    }

    /// Follows a chain of table keys, e.g. `["servers", "alpha", "ip"]`.
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        path.iter().try_fold(self, |value, key| value.get(key))
    }
}

impl From<Table> for Value {
    fn from(table: Table) -> Self {
        Value::Table(table)
    }
}
