//! Memento handles
//!
//! [`Memento`] pairs a wrapper instance with the names of its modified
//! fields. [`DynMemento`] is the type-erased form for callers that hold
//! mementos of several model types side by side.

use crate::changes::ChangeSet;
use crate::error::MementoResult;
use crate::instance::MementoInstance;
use crate::modified::ModifiedFields;
use memento_model::{AccessError, FieldAccess, FieldValue, Model};
use std::fmt::{self, Debug};

/// Field access plus modification tracking, object safe
pub trait TrackedFields: FieldAccess {
    /// Registered type name of the mirrored model
    fn type_name(&self) -> &'static str;

    /// Names of modified fields
    fn modified_names(&self) -> Vec<&'static str>;

    /// Check if a field was modified
    fn is_modified(&self, name: &str) -> bool;
}

impl<M: Model> TrackedFields for MementoInstance<'_, M> {
    fn type_name(&self) -> &'static str {
        M::type_name()
    }

    fn modified_names(&self) -> Vec<&'static str> {
        self.modified_fields().to_vec()
    }

    fn is_modified(&self, name: &str) -> bool {
        MementoInstance::is_modified(self, name)
    }
}

/// Result of a factory call: the wrapper and its modified-field set
///
/// The handle itself has no setters; field writes go through
/// [`Memento::instance_mut`].
pub struct Memento<'s, M: Model> {
    instance: MementoInstance<'s, M>,
}

impl<'s, M: Model> Memento<'s, M> {
    pub(crate) fn new(instance: MementoInstance<'s, M>) -> Self {
        Self { instance }
    }

    #[inline]
    #[must_use]
    pub fn instance(&self) -> &MementoInstance<'s, M> {
        &self.instance
    }

    #[inline]
    pub fn instance_mut(&mut self) -> &mut MementoInstance<'s, M> {
        &mut self.instance
    }

    #[inline]
    #[must_use]
    pub fn into_instance(self) -> MementoInstance<'s, M> {
        self.instance
    }

    /// Fields eligible for write-back; order carries no meaning
    #[inline]
    #[must_use]
    pub fn modified_fields(&self) -> &ModifiedFields {
        self.instance.modified_fields()
    }

    #[must_use]
    pub fn modified_names(&self) -> Vec<&'static str> {
        self.instance.modified_fields().to_vec()
    }

    /// Snapshot modified field values
    ///
    /// # Errors
    /// See [`ChangeSet::capture`]
    #[inline]
    pub fn changes(&self) -> MementoResult<ChangeSet> {
        ChangeSet::capture(&self.instance)
    }

    /// Erase the model type
    #[must_use]
    pub fn into_dyn(self) -> DynMemento<'s> {
        DynMemento {
            inner: Box::new(self.instance),
        }
    }
}

impl<M: Model> Debug for Memento<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memento")
            .field("instance", &self.instance)
            .finish()
    }
}

/// Type-erased memento
pub struct DynMemento<'s> {
    inner: Box<dyn TrackedFields + 's>,
}

impl DynMemento<'_> {
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }

    #[must_use]
    pub fn modified_fields(&self) -> Vec<&'static str> {
        self.inner.modified_names()
    }

    #[inline]
    #[must_use]
    pub fn is_modified(&self, name: &str) -> bool {
        self.inner.is_modified(name)
    }

    /// Wrapped instance as a trait object
    #[inline]
    #[must_use]
    pub fn as_tracked(&self) -> &dyn TrackedFields {
        self.inner.as_ref()
    }
}

impl FieldAccess for DynMemento<'_> {
    fn get(&self, name: &str) -> Result<FieldValue, AccessError> {
        self.inner.get(name)
    }

    fn set(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        self.inner.set(name, value)
    }
}

impl Debug for DynMemento<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynMemento")
            .field("type_name", &self.type_name())
            .field("modified", &self.modified_fields())
            .finish()
    }
}
