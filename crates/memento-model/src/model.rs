//! Model and field-access traits
//!
//! [`Model`] is what a type implements to be mirrored by a memento: it
//! registers a [`FieldTable`] and exposes per-field getters and setters.
//! [`FieldAccess`] is the name-based read/write capability set shared by
//! models and their mementos, so either can be passed where the other is
//! expected.

use crate::descriptor::FieldDescriptor;
use crate::table::FieldTable;
use crate::value::{FieldValue, ValueConversionError, ValueKind};

/// A type whose fields can be mirrored by a memento
///
/// # Contract
/// - `field_table()` returns the same table on every call
/// - `read_field`/`write_field` are only called with descriptors from that
///   table
/// - `read_field` takes `&self`; fields that keep bookkeeping on access
///   (counters, memoization) use interior mutability
///
/// # Example
/// ```rust
/// use memento_model::{AccessError, FieldDescriptor, FieldTable, FieldValue, Model, ValueKind};
/// use once_cell::sync::Lazy;
///
/// #[derive(Default)]
/// struct Tag {
///     label: String,
/// }
///
/// static TAG_FIELDS: Lazy<FieldTable> = Lazy::new(|| {
///     FieldTable::builder("Tag")
///         .field(FieldDescriptor::plain("label", ValueKind::Text))
///         .build()
///         .expect("valid tag table")
/// });
///
/// impl Model for Tag {
///     fn field_table() -> &'static FieldTable {
///         &TAG_FIELDS
///     }
///
///     fn shell() -> Self {
///         Self::default()
///     }
///
///     fn read_field(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError> {
///         match field.name() {
///             "label" => Ok(self.label.clone().into()),
///             other => Err(AccessError::unknown_field("Tag", other)),
///         }
///     }
///
///     fn write_field(&mut self, field: &FieldDescriptor, value: FieldValue) -> Result<(), AccessError> {
///         match field.name() {
///             "label" => self.label = AccessError::convert(field, value)?,
///             other => return Err(AccessError::unknown_field("Tag", other)),
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Model: Sized + 'static {
    /// Registered field table
    fn field_table() -> &'static FieldTable;

    /// Fresh instance used as the backing store of a memento
    ///
    /// Only stored (non-dispatch) fields of the shell are ever read back.
    fn shell() -> Self;

    /// Read a field
    ///
    /// # Errors
    /// Returns error if the getter fails
    fn read_field(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError>;

    /// Write a field
    ///
    /// # Errors
    /// Returns error if the setter fails or the value has the wrong kind
    fn write_field(&mut self, field: &FieldDescriptor, value: FieldValue)
        -> Result<(), AccessError>;

    /// Registered type name
    #[inline]
    #[must_use]
    fn type_name() -> &'static str {
        Self::field_table().type_name()
    }
}

/// Name-based field read/write
///
/// Implemented for every [`Model`] and for mementos of models.
pub trait FieldAccess {
    /// Read field by name
    ///
    /// # Errors
    /// Returns error if the field is unknown, unreadable, or its getter fails
    fn get(&self, name: &str) -> Result<FieldValue, AccessError>;

    /// Write field by name
    ///
    /// # Errors
    /// Returns error if the field is unknown, unwritable, or its setter fails
    fn set(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError>;
}

impl<M: Model> FieldAccess for M {
    fn get(&self, name: &str) -> Result<FieldValue, AccessError> {
        let field = M::field_table().lookup(name)?;
        if !field.is_readable() {
            return Err(AccessError::NotReadable(field.name()));
        }
        self.read_field(field)
    }

    fn set(&mut self, name: &str, value: FieldValue) -> Result<(), AccessError> {
        let field = M::field_table().lookup(name)?;
        if !field.is_writable() {
            return Err(AccessError::NotWritable(field.name()));
        }
        self.write_field(field, value)
    }
}

/// Typed helpers on top of [`FieldAccess`]
pub trait FieldAccessExt: FieldAccess {
    /// Read field and convert to `T`
    ///
    /// # Errors
    /// Returns error if the read fails or the value has another kind
    fn get_as<T>(&self, name: &str) -> Result<T, AccessError>
    where
        T: TryFrom<FieldValue, Error = ValueConversionError>,
    {
        let value = self.get(name)?;
        T::try_from(value).map_err(|e| AccessError::TypeMismatch {
            field: name.to_string(),
            expected: e.expected,
            actual: e.actual,
        })
    }

    /// Convert `value` and write it
    ///
    /// # Errors
    /// Returns error if the write fails
    fn set_as<T: Into<FieldValue>>(&mut self, name: &str, value: T) -> Result<(), AccessError> {
        self.set(name, value.into())
    }
}

impl<A: FieldAccess + ?Sized> FieldAccessExt for A {}

/// Errors raised by field getters and setters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AccessError {
    /// No such field registered
    #[error("unknown field '{field}' on {type_name}")]
    UnknownField {
        type_name: &'static str,
        field: String,
    },

    /// Field has no getter
    #[error("field '{0}' is not readable")]
    NotReadable(&'static str),

    /// Field has no setter
    #[error("field '{0}' is not writable")]
    NotWritable(&'static str),

    /// Value kind does not match the declared kind
    #[error("type mismatch on '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        actual: &'static str,
    },

    /// Getter or setter logic failed
    #[error("access to '{field}' failed: {message}")]
    Failed { field: String, message: String },
}

impl AccessError {
    /// Create unknown field error
    #[inline]
    #[must_use]
    pub fn unknown_field(type_name: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name,
            field: field.into(),
        }
    }

    /// Create failure from model logic
    #[inline]
    #[must_use]
    pub fn failed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create type mismatch for `value` written to `field`
    #[inline]
    #[must_use]
    pub fn type_mismatch(field: &FieldDescriptor, value: &FieldValue) -> Self {
        Self::TypeMismatch {
            field: field.name().to_string(),
            expected: field.kind(),
            actual: value.kind_name(),
        }
    }

    /// Convert a written value for a setter, mapping failures to
    /// [`AccessError::TypeMismatch`]
    ///
    /// # Errors
    /// Returns error if `value` does not convert into `T`
    #[inline]
    pub fn convert<T>(field: &FieldDescriptor, value: FieldValue) -> Result<T, Self>
    where
        T: TryFrom<FieldValue, Error = ValueConversionError>,
    {
        T::try_from(value).map_err(|e| Self::TypeMismatch {
            field: field.name().to_string(),
            expected: field.kind(),
            actual: e.actual,
        })
    }

    /// Field name the error refers to, if any
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownField { field, .. }
            | Self::TypeMismatch { field, .. }
            | Self::Failed { field, .. } => Some(field.as_str()),
            Self::NotReadable(field) | Self::NotWritable(field) => Some(*field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::cell::Cell;

    #[derive(Debug, Default)]
    struct Counter {
        value: i64,
        secret: String,
        reads: Cell<usize>,
    }

    static COUNTER_FIELDS: Lazy<FieldTable> = Lazy::new(|| {
        FieldTable::builder("Counter")
            .field(FieldDescriptor::plain("value", ValueKind::Int))
            .field(FieldDescriptor::new(
                "secret",
                ValueKind::Text,
                crate::Capabilities::write_only(),
            ))
            .field(FieldDescriptor::computed("doubled", ValueKind::Int))
            .build()
            .unwrap()
    });

    impl Model for Counter {
        fn field_table() -> &'static FieldTable {
            &COUNTER_FIELDS
        }

        fn shell() -> Self {
            Self::default()
        }

        fn read_field(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError> {
            self.reads.set(self.reads.get() + 1);
            match field.name() {
                "value" => Ok(self.value.into()),
                "doubled" => Ok((self.value * 2).into()),
                other => Err(AccessError::unknown_field("Counter", other)),
            }
        }

        fn write_field(
            &mut self,
            field: &FieldDescriptor,
            value: FieldValue,
        ) -> Result<(), AccessError> {
            match field.name() {
                "value" => self.value = AccessError::convert(field, value)?,
                "secret" => self.secret = AccessError::convert(field, value)?,
                other => return Err(AccessError::unknown_field("Counter", other)),
            }
            Ok(())
        }
    }

    #[test]
    fn blanket_access_reads_and_writes() {
        let mut c = Counter::default();
        c.set("value", FieldValue::Int(21)).unwrap();
        assert_eq!(c.get("doubled").unwrap(), FieldValue::Int(42));
        assert_eq!(c.get_as::<i64>("value").unwrap(), 21);
    }

    #[test]
    fn blanket_access_checks_capabilities() {
        let mut c = Counter::default();
        assert_eq!(c.get("secret"), Err(AccessError::NotReadable("secret")));
        assert_eq!(
            c.set("doubled", FieldValue::Int(1)),
            Err(AccessError::NotWritable("doubled"))
        );
        assert_eq!(c.reads.get(), 0);
    }

    #[test]
    fn write_only_field_accepts_writes() {
        let mut c = Counter::default();
        c.set_as("secret", "hunter2").unwrap();
        assert_eq!(c.secret, "hunter2");
    }

    #[test]
    fn setter_type_mismatch() {
        let mut c = Counter::default();
        let err = c.set("value", FieldValue::from("x")).unwrap_err();
        assert_eq!(
            err,
            AccessError::TypeMismatch {
                field: "value".to_string(),
                expected: ValueKind::Int,
                actual: "text",
            }
        );
        assert_eq!(err.field(), Some("value"));
    }

    #[test]
    fn get_as_reports_mismatch() {
        let c = Counter::default();
        let err = c.get_as::<String>("value").unwrap_err();
        assert!(matches!(err, AccessError::TypeMismatch { .. }));
    }

    #[test]
    fn type_name_from_table() {
        assert_eq!(Counter::type_name(), "Counter");
    }

    #[test]
    fn dyn_field_access() {
        let mut c = Counter::default();
        let access: &mut dyn FieldAccess = &mut c;
        access.set_as("value", 5_i64).unwrap();
        assert_eq!(access.get_as::<i64>("doubled").unwrap(), 10);
    }
}
