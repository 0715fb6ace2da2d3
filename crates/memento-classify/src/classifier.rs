//! Field classifier
//!
//! Partitions a model's fields into the four ways a memento can treat them.

use crate::predicate::FieldPredicate;
use memento_model::FieldDescriptor;
use std::fmt::{self, Display, Formatter};

/// How a memento treats a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Stored field copied eagerly at creation; always reported as modified
    DirectCopy,

    /// Interceptable field fetched from the source on first read and cached
    DispatchProxied,

    /// Field forced to its kind's zero value
    ExcludedDefault,

    /// Included field a memento cannot mirror (read-only, not interceptable)
    Invalid,
}

impl Classification {
    /// Check if a memento can be built with this classification
    #[inline]
    #[must_use]
    pub fn is_valid(self) -> bool {
        !matches!(self, Self::Invalid)
    }

    /// Check if writes through the memento are intercepted
    #[inline]
    #[must_use]
    pub fn is_intercepted(self) -> bool {
        matches!(self, Self::DispatchProxied | Self::ExcludedDefault)
    }

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::DirectCopy => "direct_copy",
            Self::DispatchProxied => "dispatch_proxied",
            Self::ExcludedDefault => "excluded_default",
            Self::Invalid => "invalid",
        }
    }
}

impl Display for Classification {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A field together with its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassifiedField {
    pub descriptor: FieldDescriptor,
    pub classification: Classification,
}

/// Classifier bound to an include and an exclude predicate
///
/// # Rules (first match wins)
/// 1. `exclude` matches → [`Classification::ExcludedDefault`]
/// 2. `include` does not match → skipped
/// 3. writable and not dispatch → [`Classification::DirectCopy`]
/// 4. dispatch → [`Classification::DispatchProxied`]
/// 5. otherwise → [`Classification::Invalid`]
#[derive(Debug, Clone)]
pub struct FieldClassifier {
    include: FieldPredicate,
    exclude: FieldPredicate,
}

impl FieldClassifier {
    #[inline]
    #[must_use]
    pub fn new(include: FieldPredicate, exclude: FieldPredicate) -> Self {
        Self { include, exclude }
    }

    /// Classifier with an exclude predicate that matches nothing
    #[inline]
    #[must_use]
    pub fn including(include: FieldPredicate) -> Self {
        Self::new(include, FieldPredicate::none())
    }

    #[inline]
    #[must_use]
    pub fn include(&self) -> &FieldPredicate {
        &self.include
    }

    #[inline]
    #[must_use]
    pub fn exclude(&self) -> &FieldPredicate {
        &self.exclude
    }

    /// Classify one field, `None` if it is skipped
    #[must_use]
    pub fn classify_field(&self, field: &FieldDescriptor) -> Option<Classification> {
        if self.exclude.matches(field) {
            return Some(Classification::ExcludedDefault);
        }
        if !self.include.matches(field) {
            return None;
        }

        let class = if field.is_writable() && !field.is_dispatch() {
            Classification::DirectCopy
        } else if field.is_dispatch() {
            Classification::DispatchProxied
        } else {
            Classification::Invalid
        };
        Some(class)
    }

    /// Classify fields in order, dropping skipped ones
    pub fn classify<'a, I>(&self, fields: I) -> Vec<ClassifiedField>
    where
        I: IntoIterator<Item = &'a FieldDescriptor>,
    {
        fields
            .into_iter()
            .filter_map(|descriptor| {
                self.classify_field(descriptor)
                    .map(|classification| ClassifiedField {
                        descriptor: *descriptor,
                        classification,
                    })
            })
            .collect()
    }
}

/// Classify `fields` with `include`/`exclude`
///
/// Pure: never fails, reports [`Classification::Invalid`] instead.
pub fn classify<'a, I>(
    fields: I,
    include: &FieldPredicate,
    exclude: &FieldPredicate,
) -> Vec<ClassifiedField>
where
    I: IntoIterator<Item = &'a FieldDescriptor>,
{
    FieldClassifier::new(include.clone(), exclude.clone()).classify(fields)
}
