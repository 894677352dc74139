//! Locations inside structured input or context values.
//!
//! Validation failures point at the offending part of a value with an
//! [`ErrorPath`], a list of [`PathKey`]s. Errors raised by a step's own logic
//! carry the root (empty) path.

use std::fmt::{self, Display};

use serde::Serialize;

/// One key of an [`ErrorPath`]: an object key or an array index.
///
/// Serializes untagged, so keys become JSON strings and indices JSON numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PathKey {
    /// An object key (e.g. `user`, `email`)
    Key(String),
    /// An array index (e.g. `[0]`)
    Index(usize),
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<usize> for PathKey {
    fn from(index: usize) -> Self {
        PathKey::Index(index)
    }
}

/// A path to a value inside a structured input or context.
///
/// # Example
///
/// ```rust
/// use composure::ErrorPath;
///
/// let path = ErrorPath::root().key("users").index(0).key("email");
///
/// assert_eq!(path.to_string(), "users[0].email");
/// assert_eq!(path.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct ErrorPath {
    keys: Vec<PathKey>,
}

impl ErrorPath {
    /// The empty path, pointing at the whole value.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with an object key appended.
    pub fn key(&self, key: impl Into<String>) -> Self {
        self.push(PathKey::Key(key.into()))
    }

    /// Returns a new path with an array index appended.
    pub fn index(&self, index: usize) -> Self {
        self.push(PathKey::Index(index))
    }

    fn push(&self, key: PathKey) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key);
        Self { keys }
    }

    /// Returns this path nested under `prefix`.
    pub fn prefixed(&self, prefix: &ErrorPath) -> Self {
        prefix.keys.iter().chain(self.keys.iter()).cloned().collect()
    }

    /// Returns true for the empty path.
    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Same as [`is_root`](Self::is_root).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterates over the keys from the root down.
    pub fn keys(&self) -> impl Iterator<Item = &PathKey> {
        self.keys.iter()
    }
}

impl FromIterator<PathKey> for ErrorPath {
    fn from_iter<T: IntoIterator<Item = PathKey>>(iter: T) -> Self {
        Self {
            keys: iter.into_iter().collect(),
        }
    }
}

impl<K: Into<PathKey>> From<Vec<K>> for ErrorPath {
    fn from(keys: Vec<K>) -> Self {
        keys.into_iter().map(Into::into).collect()
    }
}

impl Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            match key {
                PathKey::Key(name) if i == 0 => write!(f, "{}", name)?,
                PathKey::Key(name) => write!(f, ".{}", name)?,
                PathKey::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_empty() {
        let path = ErrorPath::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_display_mixes_keys_and_indices() {
        let path = ErrorPath::root().key("body").index(2).key("name");
        assert_eq!(path.to_string(), "body[2].name");

        let leading_index = ErrorPath::root().index(0).key("id");
        assert_eq!(leading_index.to_string(), "[0].id");
    }

    #[test]
    fn test_append_leaves_original_untouched() {
        let base = ErrorPath::root().key("users");
        let first = base.index(0);

        assert_eq!(base.to_string(), "users");
        assert_eq!(first.to_string(), "users[0]");
    }

    #[test]
    fn test_prefixed() {
        let inner = ErrorPath::root().key("email");
        let outer = ErrorPath::root().key("user");
        assert_eq!(inner.prefixed(&outer).to_string(), "user.email");
    }

    #[test]
    fn test_from_vec_of_keys() {
        let path = ErrorPath::from(vec!["a", "b"]);
        assert_eq!(path.to_string(), "a.b");
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let path = ErrorPath::root().key("items").index(3);
        let json = serde_json::to_value(&path).unwrap();
        assert_eq!(json, serde_json::json!(["items", 3]));
    }
}
