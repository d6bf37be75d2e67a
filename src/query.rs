//! Multi-valued query string collection.

use std::collections::BTreeMap;

/// Query values keyed by name, each key holding an ordered list of values.
///
/// Keys are kept sorted so the encoded query string is stable; values of a
/// single key keep their insertion order.
///
/// # Examples
///
/// ```
/// use rip::QueryValues;
///
/// let mut values = QueryValues::from([("q", "rust"), ("page", "2")]);
/// values.add("q", "http");
///
/// assert_eq!(values.encode(), "page=2&q=rust&q=http");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryValues {
    values: BTreeMap<String, Vec<String>>,
}

impl QueryValues {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value to the list stored under `key`.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    /// Returns all values stored under `key`, in insertion order.
    pub fn get(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterates over keys and their value lists in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Appends every value of `other` after the values already present.
    pub fn merge(&mut self, other: &QueryValues) {
        for (key, values) in other.iter() {
            for value in values {
                self.add(key, value.as_str());
            }
        }
    }

    /// Encodes the collection as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, values) in self.iter() {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = QueryValues::new();
        for (key, value) in iter {
            values.add(key, value);
        }
        values
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for QueryValues
where
    K: Into<String>,
    V: Into<String>,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}
