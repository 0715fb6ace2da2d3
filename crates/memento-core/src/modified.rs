//! Modified-field set
//!
//! Names of fields a caller should consider for write-back. The set only
//! grows; there is no way to remove a name.

use indexmap::IndexSet;

/// Set of field names eligible for write-back
///
/// Iterates in first-insertion order, though callers should not rely on
/// any order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifiedFields {
    names: IndexSet<&'static str>,
}

impl ModifiedFields {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a name, returning `true` if it was not present yet
    #[inline]
    pub fn insert(&mut self, name: &'static str) -> bool {
        self.names.insert(name)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.names.iter().copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Snapshot of the names
    #[must_use]
    pub fn to_vec(&self) -> Vec<&'static str> {
        self.names.iter().copied().collect()
    }
}

impl<'a> IntoIterator for &'a ModifiedFields {
    type Item = &'static str;
    type IntoIter = std::iter::Copied<indexmap::set::Iter<'a, &'static str>>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter().copied()
    }
}
