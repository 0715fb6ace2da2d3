//! Per-memento value cache
//!
//! Holds the values of intercepted fields: captured from the source on first
//! read, written through the memento, or seeded with a zero value.

use memento_model::FieldValue;
use std::collections::HashMap;

/// Field name → value map owned by one memento
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    entries: HashMap<&'static str, FieldValue>,
}

impl ValueCache {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries.get(name)
    }

    /// Store value, returning the previous one
    #[inline]
    pub fn insert(&mut self, name: &'static str, value: FieldValue) -> Option<FieldValue> {
        self.entries.insert(name, value)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
