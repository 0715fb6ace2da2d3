//! Memento Core
//!
//! Lazily mirrored, change-tracked stand-ins for live models.
//!
//! # Core Concepts
//!
//! - [`MementoFactory`]: Builds mementos from a source and two predicates
//! - [`MementoInstance`]: The stand-in; same [`FieldAccess`] surface as the source
//! - [`Memento`]: Handle pairing the instance with its [`ModifiedFields`]
//! - [`ChangeSet`]: Snapshot of modified values for an explicit commit
//! - [`PlanCache`]: Process-wide cache of compiled creation plans
//!
//! # Guarantees
//!
//! - The source is borrowed immutably and never written
//! - Each dispatch-proxied getter runs at most once per memento
//! - Direct-copy fields are marked modified from the start
//! - Excluded fields read as their kind's zero value
//!
//! # Example
//!
//! ```rust,ignore
//! use memento_core::{create, FieldPredicate};
//!
//! let memento = create(&person, &FieldPredicate::all(), &FieldPredicate::none())?;
//! let full: String = memento.instance().get_as("full_name")?;
//! let changes = memento.changes()?;
//! changes.apply_to(&mut person_for_commit)?;
//! ```
//!
//! [`FieldAccess`]: memento_model::FieldAccess

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod cache;
mod changes;
mod config;
mod error;
mod factory;
mod instance;
mod interceptor;
mod memento;
mod modified;
mod plan_cache;

pub use cache::ValueCache;
pub use changes::ChangeSet;
pub use config::{ConfigError, FactoryConfig};
pub use error::{MementoError, MementoResult};
pub use factory::{create, create_dyn, MementoFactory};
pub use instance::MementoInstance;
pub use interceptor::FieldState;
pub use memento::{DynMemento, Memento, TrackedFields};
pub use modified::ModifiedFields;
pub use plan_cache::{PlanCache, PlanKey, DEFAULT_PLAN_CAPACITY};

pub use memento_classify::{Classification, CreationPlan, FieldPredicate, PredicateKey};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use memento_model::{FieldAccess, FieldAccessExt, FieldValue};
    use memento_test_utils::{init_tracing, Account, Person};
    use pretty_assertions::assert_eq;

    #[test]
    fn person_scenario() {
        init_tracing();
        let source = Person::new("Rafael", "Salguero");
        let mut memento = create(&source, &FieldPredicate::all(), &FieldPredicate::none()).unwrap();

        let instance = memento.instance();
        assert_eq!(instance.get_as::<String>("first_name").unwrap(), "Rafael");
        assert_eq!(instance.get_as::<String>("last_name").unwrap(), "Salguero");
        assert_eq!(source.full_name_reads(), 0);

        assert_eq!(instance.get_as::<String>("full_name").unwrap(), "Rafael Salguero");
        assert_eq!(source.full_name_reads(), 1);
        assert_eq!(instance.get_as::<String>("full_name").unwrap(), "Rafael Salguero");
        assert_eq!(source.full_name_reads(), 1);

        let mut names = memento.modified_names();
        names.sort_unstable();
        assert_eq!(names, vec!["first_name", "last_name"]);

        memento
            .instance_mut()
            .set_as("first_name", "Alejandra")
            .unwrap();
        assert_eq!(source.first_name(), "Rafael");
    }

    #[test]
    fn excluded_field_reads_zero_value() {
        init_tracing();
        let source = Account::new(9, "ada", 250);
        let memento = create(
            &source,
            &FieldPredicate::all_non_dispatch_read_write(),
            &FieldPredicate::named(["pin", "nickname"]),
        )
        .unwrap();
        let instance = memento.instance();

        assert_eq!(instance.get("pin").unwrap(), FieldValue::Int(0));
        assert_eq!(instance.get("nickname").unwrap(), FieldValue::Null);
        assert_eq!(source.read_count("pin"), 0);
        assert_eq!(source.read_count("nickname"), 0);
        assert_eq!(memento.modified_names(), vec!["owner"]);
    }

    #[test]
    fn written_dispatch_fields_join_modified() {
        init_tracing();
        let source = Account::new(9, "ada", 250);
        let include = FieldPredicate::named(["owner", "balance", "nickname"]);
        let mut memento = create(&source, &include, &FieldPredicate::none()).unwrap();

        memento
            .instance_mut()
            .set("nickname", FieldValue::from("Countess"))
            .unwrap();
        memento.instance_mut().set("balance", FieldValue::Int(1)).unwrap();
        memento.instance_mut().set("balance", FieldValue::Int(2)).unwrap();

        assert_eq!(memento.modified_names(), vec!["owner", "nickname", "balance"]);
        assert_eq!(memento.instance().get("balance").unwrap(), FieldValue::Int(2));
        assert_eq!(source.read_count("balance"), 0);
        assert_eq!(source.write_count("balance"), 0);
        assert_eq!(source.write_count("nickname"), 0);
    }
}
