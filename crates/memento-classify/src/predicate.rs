//! Field predicates
//!
//! Provides [`FieldPredicate`], a labelled test over a [`FieldDescriptor`],
//! and [`PredicateKey`], its structural identity. Cached plans are keyed by
//! [`PredicateKey`]; labels are for diagnostics only.

use memento_model::FieldDescriptor;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt::{self, Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

type PredicateFn = dyn Fn(&FieldDescriptor) -> bool + Send + Sync;

/// Structural identity of a predicate
///
/// Two predicates with equal keys select the same fields. Built-ins compare
/// by construction, `named` by its name set, and closures passed to
/// [`FieldPredicate::new`] by the identity of the shared closure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateKey {
    All,
    None,
    Tagged,
    Named(BTreeSet<String>),
    NonDispatchReadWrite,
    NonDispatchReadWriteOrTagged,
    SerializationInclude,
    Or(Box<PredicateKey>, Box<PredicateKey>),
    And(Box<PredicateKey>, Box<PredicateKey>),
    Not(Box<PredicateKey>),
    Closure(ClosureId),
}

/// Identity of a user closure
///
/// Holds the closure itself, so an address is never reused while a key
/// referring to it is alive.
#[derive(Clone)]
pub struct ClosureId(Arc<PredicateFn>);

impl ClosureId {
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for ClosureId {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl Eq for ClosureId {}

impl Hash for ClosureId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl Debug for ClosureId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "ClosureId({:p})", self.addr())
    }
}

/// Labelled predicate over field descriptors
///
/// Cheap to clone (shared closure). Clones share a [`PredicateKey`].
///
/// # Example
/// ```rust
/// use memento_classify::FieldPredicate;
/// use memento_model::{FieldDescriptor, ValueKind};
///
/// let include = FieldPredicate::serialization_include();
/// assert!(include.matches(&FieldDescriptor::computed("full_name", ValueKind::Text)));
/// assert!(!include.matches(&FieldDescriptor::read_only("id", ValueKind::Int)));
/// ```
#[derive(Clone)]
pub struct FieldPredicate {
    name: Cow<'static, str>,
    key: PredicateKey,
    test: Arc<PredicateFn>,
}

impl FieldPredicate {
    /// Create predicate from closure
    ///
    /// The predicate and its clones are identified by this closure; a second
    /// call with the same label is a different predicate.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, test: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        let test: Arc<PredicateFn> = Arc::new(test);
        Self {
            name: name.into(),
            key: PredicateKey::Closure(ClosureId(Arc::clone(&test))),
            test,
        }
    }

    fn builtin<F>(name: impl Into<Cow<'static, str>>, key: PredicateKey, test: F) -> Self
    where
        F: Fn(&FieldDescriptor) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            key,
            test: Arc::new(test),
        }
    }

    /// Diagnostic label
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Structural identity (plan cache key)
    #[inline]
    #[must_use]
    pub fn key(&self) -> &PredicateKey {
        &self.key
    }

    /// Evaluate predicate
    #[inline]
    #[must_use]
    pub fn matches(&self, field: &FieldDescriptor) -> bool {
        (self.test)(field)
    }

    /// Matches every field
    #[must_use]
    pub fn all() -> Self {
        Self::builtin("all", PredicateKey::All, |_| true)
    }

    /// Matches no field (the usual exclude predicate)
    #[must_use]
    pub fn none() -> Self {
        Self::builtin("none", PredicateKey::None, |_| false)
    }

    /// Matches fields tagged for explicit inclusion
    #[must_use]
    pub fn tagged() -> Self {
        Self::builtin("tagged", PredicateKey::Tagged, FieldDescriptor::is_tagged)
    }

    /// Matches the listed field names
    ///
    /// Order and duplicates in `names` do not matter.
    #[must_use]
    pub fn named<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        let label = format!("named{names:?}");
        let set = names.clone();
        Self::builtin(label, PredicateKey::Named(names), move |field| {
            set.contains(field.name())
        })
    }

    /// Readable, writable, non-dispatch fields
    ///
    /// Selects the plain stored columns of an ORM-style model and leaves its
    /// lazy-loaded members alone.
    #[must_use]
    pub fn all_non_dispatch_read_write() -> Self {
        Self::builtin(
            "all_non_dispatch_read_write",
            PredicateKey::NonDispatchReadWrite,
            is_plain_read_write,
        )
    }

    /// Tagged fields, or readable, writable, non-dispatch fields
    #[must_use]
    pub fn all_non_dispatch_read_write_or_tagged() -> Self {
        Self::builtin(
            "all_non_dispatch_read_write_or_tagged",
            PredicateKey::NonDispatchReadWriteOrTagged,
            |field| field.is_tagged() || is_plain_read_write(field),
        )
    }

    /// Plain read-write fields, or readable dispatch fields
    ///
    /// Everything an outside reader could observe on the model.
    #[must_use]
    pub fn serialization_include() -> Self {
        Self::builtin(
            "serialization_include",
            PredicateKey::SerializationInclude,
            |field| is_plain_read_write(field) || (field.is_readable() && field.is_dispatch()),
        )
    }

    /// Either predicate
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let name = format!("({} | {})", self.name, other.name);
        let key = PredicateKey::Or(Box::new(self.key.clone()), Box::new(other.key.clone()));
        Self::builtin(name, key, move |field| {
            self.matches(field) || other.matches(field)
        })
    }

    /// Both predicates
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let name = format!("({} & {})", self.name, other.name);
        let key = PredicateKey::And(Box::new(self.key.clone()), Box::new(other.key.clone()));
        Self::builtin(name, key, move |field| {
            self.matches(field) && other.matches(field)
        })
    }

    /// Inverted predicate
    #[must_use]
    pub fn negate(self) -> Self {
        let name = format!("!{}", self.name);
        let key = PredicateKey::Not(Box::new(self.key.clone()));
        Self::builtin(name, key, move |field| !self.matches(field))
    }
}

fn is_plain_read_write(field: &FieldDescriptor) -> bool {
    field.is_readable() && field.is_writable() && !field.is_dispatch()
}

impl Debug for FieldPredicate {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldPredicate")
            .field("name", &self.name)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
