//! Sibling identity keys.

use core::fmt::{self, Display};

use crate::Str;

/// Identity token used to match siblings across renders.
///
/// Keys only need to be unique among the children of one parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    /// Integer key.
    Int(i64),
    /// String key.
    Str(Str),
}

impl Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Self::Str(value.into())
    }
}

impl From<alloc::string::String> for Key {
    fn from(value: alloc::string::String) -> Self {
        Self::Str(value.into())
    }
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<usize> for Key {
    fn from(value: usize) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

/// Sibling key contract violation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// A child list mixes keyed and unkeyed nodes.
    #[error("child list mixes keyed and unkeyed nodes")]
    Mixed,
    /// Two siblings share a key.
    #[error("duplicate sibling key `{0}`")]
    Duplicate(Key),
}

/// How the children of one list are identified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMode {
    /// Matched by position.
    Positional,
    /// Matched by key.
    Keyed,
}

/// Validates the keys of one sibling list.
///
/// An empty list is positional.
///
/// # Errors
///
/// Returns [`KeyError::Mixed`] when only some nodes are keyed and
/// [`KeyError::Duplicate`] when a key appears twice.
pub fn check_sibling_keys(nodes: &[crate::VNode]) -> Result<KeyMode, KeyError> {
    let keyed = nodes.iter().filter(|n| n.key().is_some()).count();
    if keyed == 0 {
        return Ok(KeyMode::Positional);
    }
    if keyed != nodes.len() {
        return Err(KeyError::Mixed);
    }
    let mut seen = alloc::collections::BTreeSet::new();
    for key in nodes.iter().filter_map(crate::VNode::key) {
        if !seen.insert(key) {
            return Err(KeyError::Duplicate(key.clone()));
        }
    }
    Ok(KeyMode::Keyed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::span;

    #[test]
    fn positional_when_no_keys() {
        assert_eq!(check_sibling_keys(&[span(), span()]), Ok(KeyMode::Positional));
        assert_eq!(check_sibling_keys(&[]), Ok(KeyMode::Positional));
    }

    #[test]
    fn rejects_mixed_and_duplicates() {
        assert_eq!(
            check_sibling_keys(&[span().with_key("a"), span()]),
            Err(KeyError::Mixed)
        );
        assert_eq!(
            check_sibling_keys(&[span().with_key(1), span().with_key(1)]),
            Err(KeyError::Duplicate(Key::Int(1)))
        );
    }
}
