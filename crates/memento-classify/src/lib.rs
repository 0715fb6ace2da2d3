//! Memento Field Classification
//!
//! Decides, per field, how a memento mirrors a model.
//!
//! # Core Concepts
//!
//! - [`FieldPredicate`]: Named include/exclude test over field descriptors
//! - [`FieldClassifier`]: Applies the classification rules
//! - [`Classification`]: DirectCopy / DispatchProxied / ExcludedDefault / Invalid
//! - [`CreationPlan`]: Validated classification of one model type
//!
//! # Example
//!
//! ```rust,ignore
//! use memento_classify::{CreationPlan, FieldPredicate};
//!
//! let plan = CreationPlan::for_model::<Person>(
//!     &FieldPredicate::serialization_include(),
//!     &FieldPredicate::none(),
//! )?;
//! for field in plan.direct_copy() {
//!     println!("copy {}", field.name());
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod classifier;
mod plan;
mod predicate;

pub use classifier::{classify, Classification, ClassifiedField, FieldClassifier};
pub use plan::{CreationPlan, PlanError, PlanSummary};
pub use predicate::{ClosureId, FieldPredicate, PredicateKey};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use memento_model::{Capabilities, FieldDescriptor, ValueKind};
    use proptest::prelude::*;

    const NAMES: [&str; 6] = ["a", "b", "c", "d", "e", "f"];

    fn descriptor(index: usize, flags: (bool, bool, bool, bool)) -> FieldDescriptor {
        let (readable, writable, dispatch, tagged) = flags;
        let mut caps = match (readable, writable) {
            (true, true) => Capabilities::read_write(),
            (true, false) => Capabilities::read_only(),
            (false, true) => Capabilities::write_only(),
            (false, false) => Capabilities::NONE,
        };
        if dispatch {
            caps = caps.with_dispatch();
        }
        if tagged {
            caps = caps.with_tag();
        }
        FieldDescriptor::new(NAMES[index], ValueKind::Int, caps)
    }

    fn descriptors() -> impl Strategy<Value = Vec<FieldDescriptor>> {
        proptest::collection::vec(any::<(bool, bool, bool, bool)>(), 0..=NAMES.len()).prop_map(
            |flags| {
                flags
                    .into_iter()
                    .enumerate()
                    .map(|(i, f)| descriptor(i, f))
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_exclude_takes_precedence(fields in descriptors()) {
            let exclude = FieldPredicate::tagged();
            let result = classify(&fields, &FieldPredicate::all(), &exclude);

            for c in &result {
                prop_assert_eq!(
                    c.classification == Classification::ExcludedDefault,
                    c.descriptor.is_tagged()
                );
            }
            // include matches everything, so nothing is skipped
            prop_assert_eq!(result.len(), fields.len());
        }

        #[test]
        fn prop_invalid_exactly_for_read_only_non_dispatch(fields in descriptors()) {
            let result = classify(&fields, &FieldPredicate::all(), &FieldPredicate::none());

            for c in &result {
                let d = &c.descriptor;
                let expected_invalid = !d.is_writable() && !d.is_dispatch();
                prop_assert_eq!(c.classification == Classification::Invalid, expected_invalid);
                if d.is_writable() && !d.is_dispatch() {
                    prop_assert_eq!(c.classification, Classification::DirectCopy);
                }
                if d.is_dispatch() {
                    prop_assert_eq!(c.classification, Classification::DispatchProxied);
                }
            }
        }

        #[test]
        fn prop_plan_compiles_iff_no_invalid(fields in descriptors()) {
            let table = memento_model::FieldTable::builder("Prop")
                .fields(fields.iter().copied())
                .build()
                .unwrap();
            let include = FieldPredicate::all();
            let exclude = FieldPredicate::none();

            let any_invalid = classify(&table, &include, &exclude)
                .iter()
                .any(|c| !c.classification.is_valid());
            let plan = CreationPlan::compile(&table, &include, &exclude);
            prop_assert_eq!(plan.is_err(), any_invalid);
        }
    }
}
