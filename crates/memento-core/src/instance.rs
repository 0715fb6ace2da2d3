//! Memento wrapper instance
//!
//! [`MementoInstance`] is the stand-in handed to callers. It owns a fresh
//! shell of the model for stored fields and routes intercepted fields
//! through the interception layer, which borrows the source read-only.

use crate::error::{MementoError, MementoResult};
use crate::interceptor::{FieldState, Interceptor};
use crate::modified::ModifiedFields;
use memento_classify::{Classification, CreationPlan};
use memento_model::{AccessError, FieldAccess, FieldDescriptor, FieldValue, Model};
use std::fmt::{self, Debug};
use std::sync::Arc;

/// Editable stand-in for a source model
///
/// Reads and writes go through [`FieldAccess`]:
/// - direct-copy fields live in the shell, copied from the source at creation
/// - dispatch-proxied fields are fetched from the source on first read
/// - excluded fields start at their kind's zero value
/// - fields the include predicate skipped are served by the shell untracked
///
/// The source is never written. Not `Sync`: the value cache fills lazily
/// behind a shared reference.
pub struct MementoInstance<'s, M: Model> {
    shell: M,
    interceptor: Interceptor<'s, M>,
    plan: Arc<CreationPlan>,
    check_value_kinds: bool,
}

impl<'s, M: Model> MementoInstance<'s, M> {
    pub(crate) fn new(source: &'s M, plan: Arc<CreationPlan>, check_value_kinds: bool) -> Self {
        Self {
            shell: M::shell(),
            interceptor: Interceptor::new(source),
            plan,
            check_value_kinds,
        }
    }

    /// Seed the zero value of an excluded field
    pub(crate) fn seed_default(&mut self, field: &FieldDescriptor) {
        self.interceptor.store_untracked(field, field.kind().zero());
    }

    /// Copy a stored field from the source into the shell and record it
    ///
    /// # Errors
    /// Returns [`MementoError::PropertyAccess`] if the source getter or the
    /// shell setter fails
    pub(crate) fn copy_direct(&mut self, field: &FieldDescriptor) -> MementoResult<()> {
        if !field.is_readable() {
            return Err(MementoError::property_access(
                field.name(),
                AccessError::NotReadable(field.name()),
            ));
        }

        let value = self
            .interceptor
            .source()
            .read_field(field)
            .map_err(|e| MementoError::property_access(field.name(), e))?;
        self.shell
            .write_field(field, value)
            .map_err(|e| MementoError::property_access(field.name(), e))?;

        self.interceptor.record(field.name());
        Ok(())
    }

    /// Borrowed source; calls through it are neither cached nor tracked
    #[inline]
    #[must_use]
    pub fn source(&self) -> &'s M {
        self.interceptor.source()
    }

    /// Backing shell holding stored fields
    #[inline]
    #[must_use]
    pub fn shell(&self) -> &M {
        &self.shell
    }

    /// Mutable backing shell
    ///
    /// Writes made here bypass tracking.
    #[inline]
    pub fn shell_mut(&mut self) -> &mut M {
        &mut self.shell
    }

    #[inline]
    #[must_use]
    pub fn plan(&self) -> &CreationPlan {
        &self.plan
    }

    /// Classification of a field, `None` if the include predicate skipped it
    #[inline]
    #[must_use]
    pub fn classification(&self, name: &str) -> Option<Classification> {
        self.plan.classification_of(name)
    }

    /// Interception state of a field, `None` unless the field is intercepted
    #[must_use]
    pub fn field_state(&self, name: &str) -> Option<FieldState> {
        self.classification(name)
            .filter(|c| c.is_intercepted())
            .map(|_| self.interceptor.state(name))
    }

    #[inline]
    #[must_use]
    pub fn modified_fields(&self) -> &ModifiedFields {
        self.interceptor.modified()
    }

    #[inline]
    #[must_use]
    pub fn is_modified(&self, name: &str) -> bool {
        self.interceptor.modified().contains(name)
    }

    /// Current value of a field for commit purposes
    ///
    /// Prefers the cached value and falls back to the shell, so write-only
    /// fields are not rejected for readability.
    pub(crate) fn committable_value(
        &self,
        field: &FieldDescriptor,
    ) -> Result<FieldValue, AccessError> {
        match self.interceptor.cached(field.name()) {
            Some(value) => Ok(value),
            None => self.shell.read_field(field),
        }
    }

    fn check_kind(&self, field: &FieldDescriptor, value: &FieldValue) -> Result<(), AccessError> {
        if self.check_value_kinds && !field.kind().accepts(value) {
            return Err(AccessError::type_mismatch(field, value));
        }
        Ok(())
    }
}

impl<M: Model> FieldAccess for MementoInstance<'_, M> {
    fn get(&self, name: &str) -> Result<FieldValue, AccessError> {
        let field = M::field_table().lookup(name)?;
        if !field.is_readable() {
            return Err(AccessError::NotReadable(field.name()));
        }

        match self.plan.classification_of(name) {
            Some(Classification::DispatchProxied | Classification::ExcludedDefault) => {
                self.interceptor.read(field)
            }
            _ => self.shell.read_field(field),
        }
    }

    fn set(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        let field = M::field_table().lookup(name)?;
        if !field.is_writable() {
            return Err(AccessError::NotWritable(field.name()));
        }

        match self.plan.classification_of(name) {
            Some(Classification::DispatchProxied) => {
                self.check_kind(field, &value)?;
                self.interceptor.write(field, value);
                Ok(())
            }
            Some(Classification::ExcludedDefault) => {
                self.check_kind(field, &value)?;
                self.interceptor.store_untracked(field, value);
                Ok(())
            }
            _ => self.shell.write_field(field, value),
        }
    }
}

impl<M: Model> Debug for MementoInstance<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MementoInstance")
            .field("type_name", &M::type_name())
            .field("modified", &self.interceptor.modified().to_vec())
            .field("check_value_kinds", &self.check_value_kinds)
            .finish_non_exhaustive()
    }
}
