use std::collections::hash_map::{self, HashMap};
use std::iter::FromIterator;

/// A single parameter value: plain text, or a list when the key repeats.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

impl Value {
    /// An empty text or an empty list; such a param counts as unset when merging.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(text) => text.is_empty(),
            Value::List(list) => list.is_empty(),
        }
    }

    /// Returns the text if this is a single value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            Value::List(_) => None,
        }
    }

    /// Returns the items if this is a list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::Text(_) => None,
            Value::List(list) => Some(list.as_slice()),
        }
    }

    pub(crate) fn push(&mut self, item: String) {
        match self {
            Value::Text(text) => {
                let first = std::mem::take(text);
                *self = Value::List(vec![first, item]);
            }
            Value::List(list) => list.push(item),
        }
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_owned())
    }
}

impl From<Vec<String>> for Value {
    fn from(list: Vec<String>) -> Self {
        Value::List(list)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// A mapping of parameter names to values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Params {
    inner: HashMap<String, Value>,
}

/// Parameters produced by a [`FormDecoder`](crate::FormDecoder).
pub type DecodedParams = Params;

impl Params {
    /// Creates an empty set of params.
    pub fn new() -> Params {
        Params::default()
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(key)
    }

    /// Sets `key` to `value`, returning the previous value if there was one.
    pub fn insert<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.inner.insert(key.into(), value.into())
    }

    /// Removes `key`, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.inner.remove(key)
    }

    /// Whether `key` is present, even with an empty value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// The number of keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether there are no keys at all.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterates over the params in arbitrary order.
    pub fn iter(&self) -> hash_map::Iter<'_, String, Value> {
        self.inner.iter()
    }

    /// Adds a value under `key`, turning an existing entry into a list.
    pub(crate) fn append(&mut self, key: String, value: String, as_list: bool) {
        match self.inner.entry(key) {
            hash_map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            hash_map::Entry::Vacant(entry) => {
                if as_list {
                    entry.insert(Value::List(vec![value]));
                } else {
                    entry.insert(Value::Text(value));
                }
            }
        }
    }

    /// Applies `decoded` onto these params.
    ///
    /// A key that already holds a non-empty value is left as is unless
    /// `override_params` is set. Returns the names of the keys that were kept.
    pub fn merge(&mut self, decoded: DecodedParams, override_params: bool) -> Vec<String> {
        let mut skipped = Vec::new();

        for (key, value) in decoded.inner {
            let is_set = self.inner.get(&key).map_or(false, |existing| !existing.is_empty());

            if is_set && !override_params {
                #[cfg(feature = "log")]
                log::debug!("param '{}' already set, ignoring the form value", key);

                skipped.push(key);
                continue;
            }

            self.inner.insert(key, value);
        }

        skipped
    }
}

impl IntoIterator for Params {
    type Item = (String, Value);
    type IntoIter = hash_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Params {
    type Item = (&'a String, &'a Value);
    type IntoIter = hash_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}
