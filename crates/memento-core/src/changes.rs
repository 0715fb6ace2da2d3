//! Change sets
//!
//! A [`ChangeSet`] snapshots the value of every modified field of a memento
//! so a caller can commit them onto a model explicitly. Nothing here runs
//! automatically.

use crate::error::{MementoError, MementoResult};
use crate::instance::MementoInstance;
use indexmap::IndexMap;
use memento_model::{FieldValue, Model};
use serde::Serialize;

/// Modified field values of one memento, in modification order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeSet {
    type_name: &'static str,
    changes: IndexMap<&'static str, FieldValue>,
}

impl ChangeSet {
    /// Snapshot modified fields of `instance`
    ///
    /// # Errors
    /// Returns [`MementoError::Access`] if a modified field cannot be read
    /// back from the memento
    pub fn capture<M: Model>(instance: &MementoInstance<'_, M>) -> MementoResult<Self> {
        let table = M::field_table();
        let mut changes = IndexMap::with_capacity(instance.modified_fields().len());

        for name in instance.modified_fields() {
            let field = table.lookup(name)?;
            changes.insert(name, instance.committable_value(field)?);
        }

        Ok(Self {
            type_name: M::type_name(),
            changes,
        })
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.changes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.changes.iter().map(|(name, value)| (*name, value))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.changes.keys().copied()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Write every change onto `target`
    ///
    /// Fields `target` cannot write (read-only) are skipped. Returns the
    /// names actually written. Stops at the first failing setter; earlier
    /// writes stay applied.
    ///
    /// # Errors
    /// - [`MementoError::WrongType`] if `target` is another model type
    /// - [`MementoError::Commit`] if a setter fails
    pub fn apply_to<M: Model>(&self, target: &mut M) -> MementoResult<Vec<&'static str>> {
        if M::type_name() != self.type_name {
            return Err(MementoError::WrongType {
                expected: M::type_name(),
                actual: self.type_name,
            });
        }

        let table = M::field_table();
        let mut applied = Vec::with_capacity(self.changes.len());

        for (name, value) in &self.changes {
            let field = table.lookup(name)?;
            if !field.is_writable() {
                tracing::debug!(field = *name, "skipping read-only field on commit");
                continue;
            }
            target
                .write_field(field, value.clone())
                .map_err(|source| MementoError::Commit {
                    field: field.name(),
                    source,
                })?;
            applied.push(*name);
        }

        tracing::debug!(
            type_name = self.type_name,
            applied = applied.len(),
            "applied change set"
        );
        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::create;
    use memento_classify::FieldPredicate;
    use memento_model::FieldAccess;
    use memento_test_utils::{Account, Person};
    use pretty_assertions::assert_eq;

    #[test]
    fn capture_direct_copy_and_written_dispatch() {
        let source = Account::new(1, "ada", 100);
        let include = FieldPredicate::named(["owner", "balance", "nickname"]);
        let mut memento = create(&source, &include, &FieldPredicate::none()).unwrap();

        memento.instance_mut().set("balance", FieldValue::Int(40)).unwrap();
        let _ = memento.instance().get("nickname").unwrap();

        let changes = memento.changes().unwrap();
        assert_eq!(changes.type_name(), "Account");
        assert_eq!(changes.names().collect::<Vec<_>>(), vec!["owner", "balance"]);
        assert_eq!(changes.get("balance"), Some(&FieldValue::Int(40)));
        assert!(changes.get("nickname").is_none());
    }

    #[test]
    fn apply_writes_only_changes() {
        let source = Person::new("Rafael", "Salguero");
        let mut memento = create(
            &source,
            &FieldPredicate::named(["first_name"]),
            &FieldPredicate::none(),
        )
        .unwrap();
        memento
            .instance_mut()
            .set("first_name", "Alejandra".into())
            .unwrap();

        let mut target = Person::new("Rafael", "Salguero");
        let applied = memento.changes().unwrap().apply_to(&mut target).unwrap();

        assert_eq!(applied, vec!["first_name"]);
        assert_eq!(target.first_name(), "Alejandra");
        assert_eq!(target.last_name(), "Salguero");
        assert_eq!(source.first_name(), "Rafael");
    }

    #[test]
    fn apply_rejects_other_model() {
        let source = Person::new("Rafael", "Salguero");
        let memento = create(&source, &FieldPredicate::all(), &FieldPredicate::none()).unwrap();

        let mut target = Account::new(1, "ada", 0);
        let err = memento.changes().unwrap().apply_to(&mut target).unwrap_err();
        assert!(matches!(
            err,
            MementoError::WrongType {
                expected: "Account",
                actual: "Person"
            }
        ));
    }

    #[test]
    fn serializes_in_modification_order() {
        let source = Person::new("Rafael", "Salguero");
        let memento = create(&source, &FieldPredicate::all(), &FieldPredicate::none()).unwrap();
        let json = serde_json::to_value(memento.changes().unwrap()).unwrap();

        assert_eq!(json["type_name"], "Person");
        assert_eq!(json["changes"]["first_name"]["value"], "Rafael");
        assert_eq!(json["changes"]["last_name"]["kind"], "text");
    }
}
