//! Creation plans
//!
//! A [`CreationPlan`] is the validated, per-type result of classification:
//! what a factory needs to build a memento without consulting predicates
//! again. Plans are immutable and safe to share across threads.

use crate::classifier::{Classification, ClassifiedField, FieldClassifier};
use crate::predicate::FieldPredicate;
use indexmap::IndexMap;
use memento_model::{Capabilities, FieldDescriptor, FieldTable, Model};

/// Validated classification of one model type
///
/// # Invariants
/// - contains no [`Classification::Invalid`] entry
/// - fields appear in field-table order
#[derive(Debug, Clone)]
pub struct CreationPlan {
    type_name: &'static str,
    include: String,
    exclude: String,
    fields: IndexMap<&'static str, ClassifiedField>,
    skipped: usize,
}

impl CreationPlan {
    /// Classify `table` and reject the first invalid field
    ///
    /// # Errors
    /// Returns [`PlanError::InvalidField`] if an included field is read-only
    /// and not interceptable
    pub fn compile(
        table: &FieldTable,
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> Result<Self, PlanError> {
        let classifier = FieldClassifier::new(include.clone(), exclude.clone());
        let classified = classifier.classify(table);

        if let Some(invalid) = classified
            .iter()
            .find(|c| c.classification == Classification::Invalid)
        {
            return Err(PlanError::InvalidField {
                type_name: table.type_name(),
                field: invalid.descriptor.name(),
                capabilities: invalid.descriptor.capabilities(),
            });
        }

        let skipped = table.len() - classified.len();
        let fields: IndexMap<_, _> = classified
            .into_iter()
            .map(|c| (c.descriptor.name(), c))
            .collect();

        let plan = Self {
            type_name: table.type_name(),
            include: include.name().to_string(),
            exclude: exclude.name().to_string(),
            fields,
            skipped,
        };

        tracing::trace!(
            type_name = plan.type_name,
            include = %plan.include,
            exclude = %plan.exclude,
            summary = ?plan.summary(),
            "compiled creation plan"
        );

        Ok(plan)
    }

    /// Compile plan for a model type
    ///
    /// # Errors
    /// See [`CreationPlan::compile`]
    #[inline]
    pub fn for_model<M: Model>(
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> Result<Self, PlanError> {
        Self::compile(M::field_table(), include, exclude)
    }

    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Name of the include predicate the plan was built with
    #[inline]
    #[must_use]
    pub fn include_name(&self) -> &str {
        &self.include
    }

    /// Name of the exclude predicate the plan was built with
    #[inline]
    #[must_use]
    pub fn exclude_name(&self) -> &str {
        &self.exclude
    }

    /// Classification of a field, `None` if skipped or unknown
    #[inline]
    #[must_use]
    pub fn classification_of(&self, name: &str) -> Option<Classification> {
        self.fields.get(name).map(|c| c.classification)
    }

    /// Classified entry of a field
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassifiedField> {
        self.fields.get(name)
    }

    /// All classified fields in table order
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedField> {
        self.fields.values()
    }

    /// Fields with the given classification, in table order
    pub fn with_class(
        &self,
        class: Classification,
    ) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.fields
            .values()
            .filter(move |c| c.classification == class)
            .map(|c| &c.descriptor)
    }

    pub fn direct_copy(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.with_class(Classification::DirectCopy)
    }

    pub fn dispatch_proxied(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.with_class(Classification::DispatchProxied)
    }

    pub fn excluded_default(&self) -> impl Iterator<Item = &FieldDescriptor> + '_ {
        self.with_class(Classification::ExcludedDefault)
    }

    /// Number of classified (non-skipped) fields
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

    /// Per-classification field counts
    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            skipped: self.skipped,
            ..PlanSummary::default()
        };
        for c in self.fields.values() {
            match c.classification {
                Classification::DirectCopy => summary.direct_copy += 1,
                Classification::DispatchProxied => summary.dispatch_proxied += 1,
                Classification::ExcludedDefault => summary.excluded_default += 1,
                Classification::Invalid => {}
            }
        }
        summary
    }
}

/// Field counts per classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlanSummary {
    pub direct_copy: usize,
    pub dispatch_proxied: usize,
    pub excluded_default: usize,
    pub skipped: usize,
}

/// Errors while compiling a creation plan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// Included field is read-only and cannot be intercepted
    #[error(
        "read-only field '{field}' [{capabilities}] on {type_name} cannot be mirrored; \
         only read-only dispatch fields are allowed"
    )]
    InvalidField {
        type_name: &'static str,
        field: &'static str,
        capabilities: Capabilities,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use memento_model::ValueKind;
    use pretty_assertions::assert_eq;

    fn account_table() -> FieldTable {
        FieldTable::builder("Account")
            .field(FieldDescriptor::read_only("id", ValueKind::Int))
            .field(FieldDescriptor::plain("owner", ValueKind::Text))
            .field(FieldDescriptor::lazy("balance", ValueKind::Int))
            .field(FieldDescriptor::plain("pin", ValueKind::Text))
            .field(FieldDescriptor::computed("audit_log", ValueKind::List).tagged())
            .build()
            .unwrap()
    }

    #[test]
    fn compile_groups_fields() {
        let plan = CreationPlan::compile(
            &account_table(),
            &FieldPredicate::serialization_include(),
            &FieldPredicate::named(["pin"]),
        )
        .unwrap();

        let direct: Vec<_> = plan.direct_copy().map(FieldDescriptor::name).collect();
        let proxied: Vec<_> = plan.dispatch_proxied().map(FieldDescriptor::name).collect();
        let excluded: Vec<_> = plan.excluded_default().map(FieldDescriptor::name).collect();

        assert_eq!(direct, vec!["owner"]);
        assert_eq!(proxied, vec!["balance", "audit_log"]);
        assert_eq!(excluded, vec!["pin"]);
        assert_eq!(
            plan.summary(),
            PlanSummary {
                direct_copy: 1,
                dispatch_proxied: 2,
                excluded_default: 1,
                skipped: 1,
            }
        );
        assert_eq!(plan.classification_of("id"), None);
        assert_eq!(plan.include_name(), "serialization_include");
        assert_eq!(plan.exclude_name(), r#"named{"pin"}"#);
    }

    #[test]
    fn compile_rejects_included_read_only_field() {
        let err = CreationPlan::compile(
            &account_table(),
            &FieldPredicate::all(),
            &FieldPredicate::none(),
        )
        .unwrap_err();

        assert_eq!(
            err,
            PlanError::InvalidField {
                type_name: "Account",
                field: "id",
                capabilities: Capabilities::read_only(),
            }
        );
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn excluding_invalid_field_makes_plan_valid() {
        let plan = CreationPlan::compile(
            &account_table(),
            &FieldPredicate::all(),
            &FieldPredicate::named(["id"]),
        )
        .unwrap();
        assert_eq!(
            plan.classification_of("id"),
            Some(Classification::ExcludedDefault)
        );
        assert_eq!(plan.len(), 5);
    }

    #[test]
    fn plan_preserves_table_order() {
        let plan = CreationPlan::compile(
            &account_table(),
            &FieldPredicate::all(),
            &FieldPredicate::named(["id"]),
        )
        .unwrap();
        let names: Vec<_> = plan.iter().map(|c| c.descriptor.name()).collect();
        assert_eq!(names, vec!["id", "owner", "balance", "pin", "audit_log"]);
    }
}
