//! Ordered map type for SUCC key-value structures.
//!
//! This module provides [`SuccMap`], a wrapper around [`IndexMap`] that
//! maintains insertion order. SUCC files are line oriented, so the order of
//! keys is part of the document: reading a file and writing it back must not
//! reshuffle entries.
//!
//! ## Examples
//!
//! ```rust
//! use serde_succ::{SuccMap, Value};
//!
//! let mut map = SuccMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(|v| v.as_str()), Some("Alice"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

/// An ordered map of string keys to SUCC values.
///
/// A thin wrapper around [`IndexMap`] that keeps entries in insertion
/// order, matching the line order of the file they came from.
///
/// # Examples
///
/// ```rust
/// use serde_succ::{SuccMap, Value};
///
/// let mut map = SuccMap::new();
/// map.insert("first".to_string(), Value::from(1));
/// map.insert("second".to_string(), Value::from(2));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["first", "second"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SuccMap(IndexMap<String, crate::Value>);

impl SuccMap {
    /// Creates an empty `SuccMap`.
    #[must_use]
    pub fn new() -> Self {
        SuccMap(IndexMap::new())
    }

    /// Creates an empty `SuccMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        SuccMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_succ::{SuccMap, Value};
    ///
    /// let mut map = SuccMap::new();
    /// map.insert("key".to_string(), Value::from(42));
    /// assert_eq!(map.get("key").and_then(|v| v.as_i64()), Some(42));
    /// ```
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Removes a key from the map, preserving the order of the remaining
    /// entries.
    pub fn remove(&mut self, key: &str) -> Option<crate::Value> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of elements in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl Default for SuccMap {
    fn default() -> Self {
        Self::new()
    }
}

impl From<HashMap<String, crate::Value>> for SuccMap {
    fn from(map: HashMap<String, crate::Value>) -> Self {
        SuccMap(map.into_iter().collect())
    }
}

impl From<SuccMap> for HashMap<String, crate::Value> {
    fn from(map: SuccMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for SuccMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, crate::Value)> for SuccMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        SuccMap(IndexMap::from_iter(iter))
    }
}
