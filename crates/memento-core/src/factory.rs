//! Memento factory
//!
//! Builds [`Memento`]s from a source model and two predicates:
//!
//! 1. obtain the creation plan (cached per type and predicate pair)
//! 2. build a fresh shell and an interception layer bound to the source
//! 3. seed excluded fields with their zero value
//! 4. copy direct-copy fields from the source and mark them modified
//!
//! Dispatch-proxied fields are not touched until first read. A failure in
//! any step drops the half-built wrapper; the source is never written.

use crate::config::FactoryConfig;
use crate::error::MementoResult;
use crate::instance::MementoInstance;
use crate::memento::{DynMemento, Memento};
use crate::plan_cache::PlanCache;
use memento_classify::{CreationPlan, FieldPredicate};
use memento_model::Model;
use std::sync::Arc;

/// Creates mementos according to a [`FactoryConfig`]
#[derive(Debug, Clone)]
pub struct MementoFactory {
    config: FactoryConfig,
    plans: Arc<PlanCache>,
}

impl MementoFactory {
    /// Create factory with default configuration and the global plan cache
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(FactoryConfig::default())
    }

    /// Create factory with configuration
    #[must_use]
    pub fn with_config(config: FactoryConfig) -> Self {
        Self {
            config,
            plans: PlanCache::global(),
        }
    }

    /// Use a dedicated plan cache instead of the global one
    #[inline]
    #[must_use]
    pub fn with_plan_cache(mut self, plans: Arc<PlanCache>) -> Self {
        self.plans = plans;
        self
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn plan_cache(&self) -> &Arc<PlanCache> {
        &self.plans
    }

    /// Creation plan for `M` under the given predicates
    ///
    /// # Errors
    /// Returns [`MementoError::Configuration`](crate::MementoError::Configuration)
    /// if an included field is read-only and not interceptable
    pub fn plan_for<M: Model>(
        &self,
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> MementoResult<Arc<CreationPlan>> {
        let plan = if self.config.cache_plans {
            self.plans.get_or_compile::<M>(include, exclude)?
        } else {
            Arc::new(CreationPlan::for_model::<M>(include, exclude)?)
        };
        Ok(plan)
    }

    /// Create a memento of `source`
    ///
    /// A field matching `exclude` is excluded even if `include` matches it.
    ///
    /// # Errors
    /// - [`MementoError::Configuration`](crate::MementoError::Configuration)
    ///   if an included field is read-only and not interceptable
    /// - [`MementoError::PropertyAccess`](crate::MementoError::PropertyAccess)
    ///   if copying a direct-copy field fails
    pub fn create<'s, M: Model>(
        &self,
        source: &'s M,
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> MementoResult<Memento<'s, M>> {
        match self.build(source, include, exclude) {
            Ok(instance) => {
                let summary = instance.plan().summary();
                tracing::debug!(
                    type_name = M::type_name(),
                    direct_copy = summary.direct_copy,
                    dispatch_proxied = summary.dispatch_proxied,
                    excluded_default = summary.excluded_default,
                    skipped = summary.skipped,
                    "created memento"
                );
                Ok(Memento::new(instance))
            }
            Err(e) => {
                tracing::warn!(type_name = M::type_name(), error = %e, "memento creation failed");
                Err(e)
            }
        }
    }

    /// Create a type-erased memento of `source`
    ///
    /// # Errors
    /// See [`MementoFactory::create`]
    #[inline]
    pub fn create_dyn<'s, M: Model>(
        &self,
        source: &'s M,
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> MementoResult<DynMemento<'s>> {
        self.create(source, include, exclude).map(Memento::into_dyn)
    }

    fn build<'s, M: Model>(
        &self,
        source: &'s M,
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> MementoResult<MementoInstance<'s, M>> {
        let plan = self.plan_for::<M>(include, exclude)?;
        let mut instance =
            MementoInstance::new(source, Arc::clone(&plan), self.config.check_value_kinds);

        for field in plan.excluded_default() {
            instance.seed_default(field);
        }
        for field in plan.direct_copy() {
            instance.copy_direct(field)?;
        }

        Ok(instance)
    }
}

impl Default for MementoFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a memento with a default factory
///
/// # Errors
/// See [`MementoFactory::create`]
///
/// # Example
/// ```rust
/// use memento_classify::FieldPredicate;
/// use memento_core::create;
/// use memento_model::FieldAccessExt;
/// use memento_test_utils::Person;
///
/// let source = Person::new("Rafael", "Salguero");
/// let mut memento = create(&source, &FieldPredicate::all(), &FieldPredicate::none()).unwrap();
///
/// assert_eq!(memento.instance().get_as::<String>("full_name").unwrap(), "Rafael Salguero");
/// memento.instance_mut().set_as("first_name", "Alejandra").unwrap();
/// assert_eq!(source.first_name(), "Rafael");
/// ```
#[inline]
pub fn create<'s, M: Model>(
    source: &'s M,
    include: &FieldPredicate,
    exclude: &FieldPredicate,
) -> MementoResult<Memento<'s, M>> {
    MementoFactory::new().create(source, include, exclude)
}

/// Create a type-erased memento with a default factory
///
/// # Errors
/// See [`MementoFactory::create`]
#[inline]
pub fn create_dyn<'s, M: Model>(
    source: &'s M,
    include: &FieldPredicate,
    exclude: &FieldPredicate,
) -> MementoResult<DynMemento<'s>> {
    MementoFactory::new().create_dyn(source, include, exclude)
}
