//! Per-type field tables
//!
//! A [`FieldTable`] is the registration a model makes once: its type name
//! and the ordered set of its field descriptors.

use crate::descriptor::FieldDescriptor;
use crate::model::AccessError;
use indexmap::IndexMap;

/// Ordered, name-indexed descriptor table of a model type
///
/// # Invariants
/// - field names are unique and non-empty
/// - iteration order is registration order
#[derive(Debug, Clone)]
pub struct FieldTable {
    type_name: &'static str,
    fields: IndexMap<&'static str, FieldDescriptor>,
}

impl FieldTable {
    /// Start building a table for `type_name`
    #[inline]
    #[must_use]
    pub fn builder(type_name: &'static str) -> FieldTableBuilder {
        FieldTableBuilder::new(type_name)
    }

    /// Name of the registered type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    /// Get descriptor or fail with [`AccessError::UnknownField`]
    ///
    /// # Errors
    /// Returns error if no field is registered under `name`
    #[inline]
    pub fn lookup(&self, name: &str) -> Result<&FieldDescriptor, AccessError> {
        self.fields
            .get(name)
            .ok_or_else(|| AccessError::unknown_field(self.type_name, name))
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Descriptors in registration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    /// Field names in registration order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.keys().copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'a> IntoIterator for &'a FieldTable {
    type Item = &'a FieldDescriptor;
    type IntoIter = indexmap::map::Values<'a, &'static str, FieldDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.values()
    }
}

/// Builder for [`FieldTable`]
#[derive(Debug)]
pub struct FieldTableBuilder {
    type_name: &'static str,
    fields: Vec<FieldDescriptor>,
}

impl FieldTableBuilder {
    #[inline]
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            fields: Vec::new(),
        }
    }

    /// Register a field
    #[inline]
    #[must_use]
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Register several fields
    #[inline]
    #[must_use]
    pub fn fields(mut self, descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(descriptors);
        self
    }

    /// Build table
    ///
    /// # Errors
    /// Returns error on an empty field name or a duplicate registration
    pub fn build(self) -> Result<FieldTable, TableError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());
        for descriptor in self.fields {
            if descriptor.name().is_empty() {
                return Err(TableError::EmptyName {
                    type_name: self.type_name,
                });
            }
            if fields.insert(descriptor.name(), descriptor).is_some() {
                return Err(TableError::DuplicateField {
                    type_name: self.type_name,
                    field: descriptor.name(),
                });
            }
        }

        Ok(FieldTable {
            type_name: self.type_name,
            fields,
        })
    }
}

/// Errors while registering a field table
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// Same name registered twice
    #[error("field '{field}' registered twice on {type_name}")]
    DuplicateField {
        type_name: &'static str,
        field: &'static str,
    },

    /// Descriptor with an empty name
    #[error("empty field name on {type_name}")]
    EmptyName { type_name: &'static str },
}
