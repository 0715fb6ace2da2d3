//! Error types for memento construction and use
//!
//! - [`MementoError::Configuration`]: an included field cannot be mirrored
//! - [`MementoError::PropertyAccess`]: eager copy of a stored field failed
//! - [`MementoError::Access`]: a read/write on a finished memento failed in
//!   the model's own logic
//! - [`MementoError::Commit`] / [`MementoError::WrongType`]: applying a
//!   change set failed

use memento_classify::PlanError;
use memento_model::AccessError;

/// Main memento error type
#[derive(Debug, thiserror::Error)]
pub enum MementoError {
    /// Included field is read-only and not interceptable
    #[error("configuration error: read-only field '{field}' on {type_name} cannot be mirrored")]
    Configuration {
        type_name: &'static str,
        field: &'static str,
    },

    /// Source getter or memento setter failed during eager copy
    #[error("property access failed for '{field}': {source}")]
    PropertyAccess {
        field: &'static str,
        #[source]
        source: AccessError,
    },

    /// Field read/write failed after creation
    #[error(transparent)]
    Access(#[from] AccessError),

    /// Writing a change onto the target failed
    #[error("commit of '{field}' failed: {source}")]
    Commit {
        field: &'static str,
        #[source]
        source: AccessError,
    },

    /// Change set applied to a different model type
    #[error("change set for {actual} cannot be applied to {expected}")]
    WrongType {
        expected: &'static str,
        actual: &'static str,
    },
}

impl MementoError {
    /// Create property access error
    #[inline]
    #[must_use]
    pub fn property_access(field: &'static str, source: AccessError) -> Self {
        Self::PropertyAccess { field, source }
    }

    /// Check if error is a configuration error
    #[inline]
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Check if error is a property access error
    #[inline]
    #[must_use]
    pub fn is_property_access(&self) -> bool {
        matches!(self, Self::PropertyAccess { .. })
    }

    /// Field the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Configuration { field, .. }
            | Self::PropertyAccess { field, .. }
            | Self::Commit { field, .. } => Some(*field),
            Self::Access(e) => e.field(),
            Self::WrongType { .. } => None,
        }
    }
}

impl From<PlanError> for MementoError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::InvalidField {
                type_name, field, ..
            } => Self::Configuration { type_name, field },
        }
    }
}

/// Result type alias for memento operations
pub type MementoResult<T> = Result<T, MementoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use memento_model::Capabilities;
    use std::error::Error as _;

    #[test]
    fn plan_error_maps_to_configuration() {
        let err: MementoError = PlanError::InvalidField {
            type_name: "Account",
            field: "id",
            capabilities: Capabilities::read_only(),
        }
        .into();
        assert!(err.is_configuration());
        assert_eq!(err.field(), Some("id"));
        assert_eq!(
            err.to_string(),
            "configuration error: read-only field 'id' on Account cannot be mirrored"
        );
    }

    #[test]
    fn property_access_keeps_cause() {
        let err = MementoError::property_access("owner", AccessError::failed("owner", "db down"));
        assert!(err.is_property_access());
        let cause = err.source().expect("cause");
        assert_eq!(cause.to_string(), "access to 'owner' failed: db down");
    }

    #[test]
    fn access_error_is_transparent() {
        let err: MementoError = AccessError::NotWritable("full_name").into();
        assert_eq!(err.to_string(), "field 'full_name' is not writable");
        assert_eq!(err.field(), Some("full_name"));
    }
}
