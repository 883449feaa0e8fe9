//! Ordered member map for dynamic objects.
//!
//! [`ObjectMap`] wraps an [`IndexMap`] so that members keep the order in which
//! they were decoded or inserted. Encoding a [`Value::Object`](crate::Value)
//! writes members in that order, which keeps re-encoded documents identical to
//! their input.
//!
//! ```rust
//! use refjson::{ObjectMap, Value};
//!
//! let mut map = ObjectMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("name").and_then(Value::as_str), Some("Alice"));
//! assert_eq!(Value::Object(map).to_string(), r#"{"name":"Alice","age":30}"#);
//! ```

use crate::Value;
use indexmap::IndexMap;

/// An insertion-ordered map of member names to [`Value`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectMap(IndexMap<String, Value>);

impl ObjectMap {
    #[must_use]
    pub fn new() -> Self {
        ObjectMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ObjectMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a member, returning the previous value under that name.
    ///
    /// Replacing a member keeps its original position.
    pub fn insert(&mut self, name: String, value: Value) -> Option<Value> {
        self.0.insert(name, value)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.0.get_mut(name)
    }

    #[must_use]
    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Removes a member, shifting later members down to keep their order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use refjson::{ObjectMap, Value};
    ///
    /// let mut map: ObjectMap = [("a", 1), ("b", 2), ("c", 3)]
    ///     .into_iter()
    ///     .map(|(k, v)| (k.to_string(), Value::from(v)))
    ///     .collect();
    /// map.remove("a");
    /// let names: Vec<_> = map.keys().map(String::as_str).collect();
    /// assert_eq!(names, ["b", "c"]);
    /// ```
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a ObjectMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ObjectMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for ObjectMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        ObjectMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, Value)> for ObjectMap {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_keeps_position() {
        let mut map = ObjectMap::new();
        map.insert("x".to_string(), Value::from(1));
        map.insert("y".to_string(), Value::from(2));
        let old = map.insert("x".to_string(), Value::from(3));

        assert_eq!(old, Some(Value::from(1)));
        let entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();
        assert_eq!(entries, vec![("x", Value::from(3)), ("y", Value::from(2))]);
    }

    #[test]
    fn test_get_mut_and_contains() {
        let mut map = ObjectMap::with_capacity(1);
        map.insert("list".to_string(), Value::Array(vec![]));
        if let Some(Value::Array(items)) = map.get_mut("list") {
            items.push(Value::Null);
        }
        assert!(map.contains_key("list"));
        assert!(!map.contains_key("other"));
        assert_eq!(map.get("list"), Some(&Value::Array(vec![Value::Null])));
    }

    #[test]
    fn test_equality_ignores_order() {
        let mut a = ObjectMap::new();
        a.extend([
            ("p".to_string(), Value::Null),
            ("q".to_string(), Value::Null),
        ]);
        let b: ObjectMap = [
            ("q".to_string(), Value::Null),
            ("p".to_string(), Value::Null),
        ]
        .into_iter()
        .collect();
        assert_eq!(a, b);
        assert_eq!(a.keys().collect::<Vec<_>>(), ["p", "q"]);
        assert_eq!(b.keys().collect::<Vec<_>>(), ["q", "p"]);
    }
}
