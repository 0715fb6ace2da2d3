//! Process-wide creation plan cache using moka
//!
//! Compiling a plan walks the model's field table and evaluates both
//! predicates per field. [`PlanCache`] does that once per
//! (model type, include key, exclude key) and hands out shared, immutable
//! plans afterwards. Entries are keyed by [`PredicateKey`], never by
//! predicate labels, and the cache is bounded.

use memento_classify::{CreationPlan, FieldPredicate, PlanError, PredicateKey};
use memento_model::Model;
use moka::sync::Cache;
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::sync::Arc;

/// Default maximum number of cached plans
pub const DEFAULT_PLAN_CAPACITY: u64 = 1024;

static GLOBAL: Lazy<Arc<PlanCache>> = Lazy::new(|| Arc::new(PlanCache::new()));

/// Cache key: model type plus structural predicate identities
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanKey {
    type_id: TypeId,
    include: PredicateKey,
    exclude: PredicateKey,
}

impl PlanKey {
    /// Create key for model `M`
    #[inline]
    #[must_use]
    pub fn new<M: Model>(include: &FieldPredicate, exclude: &FieldPredicate) -> Self {
        Self {
            type_id: TypeId::of::<M>(),
            include: include.key().clone(),
            exclude: exclude.key().clone(),
        }
    }

    #[inline]
    #[must_use]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }
}

/// Shared, bounded cache of compiled creation plans
///
/// Only valid plans are stored; an invalid configuration is recompiled (and
/// rejected) on every attempt. Least-used plans are evicted beyond the
/// capacity and simply recompiled on the next request.
#[derive(Debug, Clone)]
pub struct PlanCache {
    plans: Cache<PlanKey, Arc<CreationPlan>>,
}

impl PlanCache {
    /// Create cache with [`DEFAULT_PLAN_CAPACITY`]
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_PLAN_CAPACITY)
    }

    /// Create cache holding at most `max_capacity` plans
    #[inline]
    #[must_use]
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            plans: Cache::new(max_capacity),
        }
    }

    /// Process-wide cache used by default factories
    #[inline]
    #[must_use]
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    /// Get cached plan or compile and insert it
    ///
    /// # Errors
    /// Returns error if the plan does not compile
    pub fn get_or_compile<M: Model>(
        &self,
        include: &FieldPredicate,
        exclude: &FieldPredicate,
    ) -> Result<Arc<CreationPlan>, PlanError> {
        let key = PlanKey::new::<M>(include, exclude);

        if let Some(plan) = self.plans.get(&key) {
            tracing::trace!(type_name = M::type_name(), "plan cache hit");
            return Ok(plan);
        }

        tracing::trace!(type_name = M::type_name(), "plan cache miss");
        let compiled = Arc::new(CreationPlan::for_model::<M>(include, exclude)?);

        // A concurrent compile may have won the race; keep the first plan.
        Ok(self.plans.get_with(key, move || compiled))
    }

    /// Check if a plan is cached
    #[inline]
    #[must_use]
    pub fn contains<M: Model>(&self, include: &FieldPredicate, exclude: &FieldPredicate) -> bool {
        self.plans.contains_key(&PlanKey::new::<M>(include, exclude))
    }

    /// Number of cached plans, after pending evictions are applied
    #[must_use]
    pub fn len(&self) -> u64 {
        self.plans.run_pending_tasks();
        self.plans.entry_count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached plan
    pub fn clear(&self) {
        self.plans.invalidate_all();
        self.plans.run_pending_tasks();
    }
}

impl Default for PlanCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memento_test_utils::{Account, Person};

    #[test]
    fn compile_once_then_share() {
        let cache = PlanCache::new();
        let include = FieldPredicate::serialization_include();
        let exclude = FieldPredicate::none();

        let first = cache.get_or_compile::<Person>(&include, &exclude).unwrap();
        let second = cache.get_or_compile::<Person>(&include, &exclude).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
        assert!(cache.contains::<Person>(&include, &exclude));
    }

    #[test]
    fn key_distinguishes_types_and_predicates() {
        let cache = PlanCache::new();
        let include = FieldPredicate::all_non_dispatch_read_write();
        let none = FieldPredicate::none();

        cache.get_or_compile::<Person>(&include, &none).unwrap();
        cache.get_or_compile::<Account>(&include, &none).unwrap();
        cache
            .get_or_compile::<Person>(&include, &FieldPredicate::named(["last_name"]))
            .unwrap();

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains::<Account>(&FieldPredicate::all(), &none));
    }

    #[test]
    fn equal_structure_shares_entry() {
        let cache = PlanCache::new();
        let none = FieldPredicate::none();

        let a = cache
            .get_or_compile::<Account>(&FieldPredicate::named(["pin", "owner"]), &none)
            .unwrap();
        let b = cache
            .get_or_compile::<Account>(&FieldPredicate::named(["owner", "pin"]), &none)
            .unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn same_label_closures_get_own_plans() {
        let cache = PlanCache::new();
        let only_owner = FieldPredicate::new("user_exclude", |f| f.name() == "owner");
        let only_pin = FieldPredicate::new("user_exclude", |f| f.name() == "pin");
        let include = FieldPredicate::all_non_dispatch_read_write();

        let first = cache.get_or_compile::<Account>(&include, &only_owner).unwrap();
        let second = cache.get_or_compile::<Account>(&include, &only_pin).unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(
            second.classification_of("pin"),
            Some(memento_classify::Classification::ExcludedDefault)
        );
        assert_eq!(
            second.classification_of("owner"),
            Some(memento_classify::Classification::DirectCopy)
        );
    }

    #[test]
    fn capacity_bounds_entries() {
        let cache = PlanCache::with_capacity(4);
        let none = FieldPredicate::none();
        let names = ["owner", "balance", "pin", "nickname", "audit_log"];

        for i in 0..names.len() {
            for j in i..names.len() {
                cache
                    .get_or_compile::<Account>(&FieldPredicate::named([names[i], names[j]]), &none)
                    .unwrap();
            }
        }

        assert!(cache.len() <= 4);
    }

    #[test]
    fn invalid_plans_are_not_cached() {
        let cache = PlanCache::new();
        let result = cache.get_or_compile::<Account>(&FieldPredicate::all(), &FieldPredicate::none());

        assert!(matches!(result, Err(PlanError::InvalidField { field: "id", .. })));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear_empties_cache() {
        let cache = PlanCache::new();
        cache
            .get_or_compile::<Person>(&FieldPredicate::all(), &FieldPredicate::none())
            .unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn plan_key_type_id() {
        let key = PlanKey::new::<Person>(&FieldPredicate::all(), &FieldPredicate::none());
        assert_eq!(key.type_id(), TypeId::of::<Person>());
    }

    #[test]
    fn global_cache_is_shared() {
        assert!(Arc::ptr_eq(&PlanCache::global(), &PlanCache::global()));
    }
}
