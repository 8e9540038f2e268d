//! Document body and metadata maps
//!
//! A [`Document`] is an ordered mapping from field names to [`Value`]s.
//! Field order is the insertion order, so converting the same source twice
//! yields the same field sequence. Equality ignores order.
//!
//! [`Metadata`] shares the representation. It is kept apart from the body
//! and carries system fields such as content type or id history.

use indexmap::map::{IntoIter, Iter, Keys};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Ordered field map forming a document body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(IndexMap<String, Value>);

/// Metadata side-map of a document
pub type Metadata = Document;

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Document(IndexMap::new())
    }

    /// Create an empty document with room for `capacity` fields
    pub fn with_capacity(capacity: usize) -> Self {
        Document(IndexMap::with_capacity(capacity))
    }

    /// Builder-style insert, for literal construction
    ///
    /// ```
    /// use tenantdb_core::Document;
    ///
    /// let doc = Document::new()
    ///     .with("firstname", "John")
    ///     .with("lastname", "Smith");
    /// assert_eq!(doc.len(), 2);
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Insert a field, returning the previous value if present.
    ///
    /// Re-inserting an existing field keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Get a mutable reference to a field value
    pub fn get_mut(&mut self, field: &str) -> Option<&mut Value> {
        self.0.get_mut(field)
    }

    /// Remove a field, preserving the order of the remaining ones
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.0.shift_remove(field)
    }

    /// Check whether a field is present
    pub fn contains_key(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the document has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Field names in order
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Iterate fields in order
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document(iter.into_iter().collect())
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Extend<(String, Value)> for Document {
    fn extend<I: IntoIterator<Item = (String, Value)>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}
