//! Interception layer
//!
//! Serves intercepted fields of one memento. Each field name moves
//! independently between two states:
//!
//! | state    | read                              | write                        |
//! |----------|-----------------------------------|------------------------------|
//! | `Unset`  | fetch from source, cache → Cached | cache, mark modified → Cached |
//! | `Cached` | return cached value               | overwrite cached value        |
//!
//! The source is only ever read, never written.

use crate::cache::ValueCache;
use crate::modified::ModifiedFields;
use memento_model::{AccessError, FieldDescriptor, FieldValue, Model};
use std::cell::RefCell;

/// Interception state of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldState {
    /// Not read or written through the memento yet
    Unset,
    /// Value held by the memento
    Cached,
}

impl FieldState {
    #[inline]
    #[must_use]
    pub fn is_cached(self) -> bool {
        matches!(self, Self::Cached)
    }
}

pub(crate) struct Interceptor<'s, M> {
    source: &'s M,
    cache: RefCell<ValueCache>,
    modified: ModifiedFields,
}

impl<'s, M: Model> Interceptor<'s, M> {
    pub(crate) fn new(source: &'s M) -> Self {
        Self {
            source,
            cache: RefCell::new(ValueCache::new()),
            modified: ModifiedFields::new(),
        }
    }

    #[inline]
    pub(crate) fn source(&self) -> &'s M {
        self.source
    }

    /// Cached value, or fetch once from the source
    ///
    /// A failing source getter leaves the field `Unset`.
    pub(crate) fn read(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError> {
        let cached = self.cache.borrow().get(field.name()).cloned();
        if let Some(value) = cached {
            tracing::trace!(field = field.name(), "intercepted read (cached)");
            return Ok(value);
        }

        let value = self.source.read_field(field)?;
        tracing::trace!(field = field.name(), "intercepted read (fetched from source)");
        self.cache.borrow_mut().insert(field.name(), value.clone());
        Ok(value)
    }

    /// Cache value and mark the field modified
    pub(crate) fn write(&mut self, field: &FieldDescriptor, value: FieldValue) {
        tracing::trace!(field = field.name(), kind = value.kind_name(), "intercepted write");
        self.cache.get_mut().insert(field.name(), value);
        self.modified.insert(field.name());
    }

    /// Cache value without marking the field modified
    pub(crate) fn store_untracked(&mut self, field: &FieldDescriptor, value: FieldValue) {
        self.cache.get_mut().insert(field.name(), value);
    }

    /// Mark a field modified without caching anything
    #[inline]
    pub(crate) fn record(&mut self, name: &'static str) {
        self.modified.insert(name);
    }

    pub(crate) fn state(&self, name: &str) -> FieldState {
        if self.cache.borrow().contains(name) {
            FieldState::Cached
        } else {
            FieldState::Unset
        }
    }

    pub(crate) fn cached(&self, name: &str) -> Option<FieldValue> {
        self.cache.borrow().get(name).cloned()
    }

    #[inline]
    pub(crate) fn modified(&self) -> &ModifiedFields {
        &self.modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memento_test_utils::Account;

    fn balance() -> &'static FieldDescriptor {
        Account::field_table().get("balance").unwrap()
    }

    #[test]
    fn read_fetches_once() {
        let source = Account::new(7, "ada", 100);
        let interceptor = Interceptor::new(&source);

        assert_eq!(interceptor.state("balance"), FieldState::Unset);
        assert_eq!(interceptor.read(balance()).unwrap(), FieldValue::Int(100));
        assert_eq!(interceptor.read(balance()).unwrap(), FieldValue::Int(100));
        assert_eq!(source.read_count("balance"), 1);
        assert!(interceptor.state("balance").is_cached());
        assert!(interceptor.modified().is_empty());
    }

    #[test]
    fn write_before_read_skips_source() {
        let source = Account::new(7, "ada", 100);
        let mut interceptor = Interceptor::new(&source);

        interceptor.write(balance(), FieldValue::Int(5));
        assert_eq!(interceptor.read(balance()).unwrap(), FieldValue::Int(5));
        assert_eq!(source.read_count("balance"), 0);
        assert_eq!(source.write_count("balance"), 0);
        assert!(interceptor.modified().contains("balance"));
    }

    #[test]
    fn untracked_store_is_cached_only() {
        let source = Account::new(7, "ada", 100);
        let mut interceptor = Interceptor::new(&source);

        interceptor.store_untracked(balance(), FieldValue::Int(0));
        assert_eq!(interceptor.cached("balance"), Some(FieldValue::Int(0)));
        assert!(interceptor.modified().is_empty());

        interceptor.record("owner");
        assert_eq!(interceptor.modified().to_vec(), vec!["owner"]);
    }
}
