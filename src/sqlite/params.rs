use std::collections::HashMap;

use super::Value;

/// Normalize a bind name to the `:name` form SQLite reports for named
/// parameters. Names already carrying a SQLite prefix are left alone.
fn placeholder(name: &str) -> String {
    if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!(":{name}")
    }
}

/// Parameter bindings for SQL queries
///
/// Named entries keep insertion order; setting a name twice replaces the
/// earlier value in place. Positional entries fill the anonymous `?` slots
/// of a statement in order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Params {
    named: Vec<(String, Value)>,
    positional: Vec<Value>,
}

impl Params {
    /// Create a new Params object
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a named value
    pub fn with_value(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Add a positional value
    pub fn with_positional(mut self, value: impl Into<Value>) -> Self {
        self.push(value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        let name = placeholder(name);
        let value = value.into();
        match self.named.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.named.push((name, value)),
        }
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.positional.push(value.into());
    }

    /// Look up a named value; `id` and `:id` address the same entry.
    pub fn get(&self, name: &str) -> Option<&Value> {
        let name = placeholder(name);
        self.named
            .iter()
            .find(|(existing, _)| *existing == name)
            .map(|(_, value)| value)
    }

    pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.named.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn len(&self) -> usize {
        self.named.len() + self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.set(name.as_ref(), value);
        }
        params
    }
}

/// Bind input as callers hand it over: nothing, a lone value, or a
/// structured parameter set.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Bind {
    #[default]
    Empty,
    Scalar(Value),
    Structured(Params),
}

impl Bind {
    /// Normalize into a [`Params`].
    ///
    /// Structured input passes through untouched, a non-empty scalar becomes a
    /// single positional entry, anything else an empty set.
    pub fn cleanup(self) -> Params {
        match self {
            Bind::Structured(params) => params,
            Bind::Scalar(value) if !value.is_empty() => Params::new().with_positional(value),
            Bind::Scalar(_) | Bind::Empty => Params::new(),
        }
    }
}

/// Free-function form of [`Bind::cleanup`].
pub fn cleanup(bind: impl Into<Bind>) -> Params {
    bind.into().cleanup()
}

impl From<Params> for Bind {
    fn from(params: Params) -> Self {
        Bind::Structured(params)
    }
}

impl From<Value> for Bind {
    fn from(value: Value) -> Self {
        Bind::Scalar(value)
    }
}

impl From<i64> for Bind {
    fn from(value: i64) -> Self {
        Bind::Scalar(value.into())
    }
}

impl From<i32> for Bind {
    fn from(value: i32) -> Self {
        Bind::Scalar(value.into())
    }
}

impl From<&str> for Bind {
    fn from(value: &str) -> Self {
        Bind::Scalar(value.into())
    }
}

impl From<String> for Bind {
    fn from(value: String) -> Self {
        Bind::Scalar(value.into())
    }
}

impl<T: Into<Bind>> From<Option<T>> for Bind {
    fn from(value: Option<T>) -> Self {
        value.map_or(Bind::Empty, Into::into)
    }
}

/// Column name to value assignments for insert and update, in insertion order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Columns {
    values: Vec<(String, Value)>,
}

impl Columns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, column: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        match self.values.iter_mut().find(|(existing, _)| existing == column) {
            Some(slot) => slot.1 = value,
            None => self.values.push((column.to_string(), value)),
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(column, value)| (column.as_str(), value))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(column, _)| column.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The row a select would return for exactly these columns.
    pub fn into_row(self) -> HashMap<String, Value> {
        self.values.into_iter().collect()
    }
}

impl<K: AsRef<str>, V: Into<Value>> FromIterator<(K, V)> for Columns {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Columns::new(), |columns, (column, value)| {
                columns.with_value(column.as_ref(), value)
            })
    }
}
