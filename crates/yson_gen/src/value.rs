//! Generated value trees.

/// A generated cell value.
///
/// Composite columns map onto the container variants: tuples become `List`,
/// structs become `Map`, variants become `Tagged` and dicts become `Pairs`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    /// Named entries in declaration order
    Map(Vec<(String, Value)>),
    /// Variant alternative index and its value
    Tagged(usize, Box<Value>),
    /// Dict entries in generation order; keys may repeat
    Pairs(Vec<(Value, Value)>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

/// One generated row: `(column name, value)` pairs in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: Vec<(String, Value)>,
}

impl Row {
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            cells: Vec::with_capacity(columns),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: Value) {
        self.cells.push((name.into(), value));
    }

    /// First value stored under `name`
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.cells.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn into_value(self) -> Value {
        Value::Map(self.cells)
    }
}
