//! Attribute and style values.

use alloc::{string::String, vec::Vec};
use core::fmt::{self, Display};

use crate::Str;

/// A property, attribute or style value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String value.
    Str(Str),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Boolean attribute. `true` renders the bare name, `false` omits it.
    Bool(bool),
}

impl Value {
    /// Returns `false` only for `Bool(false)`, which is never rendered.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        !matches!(self, Self::Bool(false))
    }

    /// Returns `true` for values rendered as a bare attribute name.
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        matches!(self, Self::Bool(true))
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

impl From<Str> for Value {
    fn from(value: Str) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// An insertion-ordered set of named values.
///
/// Used for element props and inline styles. Serialization follows insertion
/// order, and two sets are equal only when they hold the same pairs in the same
/// order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attrs(Vec<(Str, Value)>);

impl Attrs {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Adds a value, returning the updated set.
    #[must_use]
    pub fn with(mut self, name: impl Into<Str>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Inserts a value. An existing entry with the same name keeps its position.
    pub fn insert(&mut self, name: impl Into<Str>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.0.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// Removes an entry, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let index = self.0.iter().position(|(n, _)| &**n == name)?;
        Some(self.0.remove(index).1)
    }

    /// Looks up a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| &**n == name).map(|(_, v)| v)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Str, &Value)> {
        self.0.iter().map(|(n, v)| (n, v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<Str>, V: Into<Value>> FromIterator<(K, V)> for Attrs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut attrs = Self::new();
        for (k, v) in iter {
            attrs.insert(k, v);
        }
        attrs
    }
}

impl<K: Into<Str>, V: Into<Value>, const N: usize> From<[(K, V); N]> for Attrs {
    fn from(value: [(K, V); N]) -> Self {
        value.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_original_position() {
        let mut attrs = Attrs::from([("id", "1"), ("title", "a")]);
        attrs.insert("id", "2");
        let names: Vec<_> = attrs.iter().map(|(n, _)| n.to_string()).collect();
        assert_eq!(names, ["id", "title"]);
        assert_eq!(attrs.get("id"), Some(&Value::from("2")));
    }

    #[test]
    fn equality_is_order_sensitive() {
        let a = Attrs::from([("a", 1), ("b", 2)]);
        let b = Attrs::from([("b", 2), ("a", 1)]);
        assert_ne!(a, b);
    }

    #[test]
    fn display_numbers() {
        assert_eq!(Value::from(1).to_string(), "1");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert!(!Value::from(false).is_present());
        assert!(Value::from(true).is_bare());
    }
}
