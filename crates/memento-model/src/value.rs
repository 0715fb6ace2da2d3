//! Dynamic field values
//!
//! Provides [`FieldValue`], the value carried across the field-access
//! boundary, and [`ValueKind`], the declared type of a field.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Declared value type of a field
///
/// Every kind has a zero value (see [`ValueKind::zero`]) that excluded
/// fields are seeded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Boolean flag
    Bool,

    /// Signed 64-bit integer
    Int,

    /// 64-bit float
    Float,

    /// UTF-8 text
    Text,

    /// Raw bytes
    Bytes,

    /// Ordered list of values
    List,

    /// Optional value of any kind (zero value is `Null`)
    Nullable,
}

impl ValueKind {
    /// Zero/absent value for this kind
    #[must_use]
    pub fn zero(self) -> FieldValue {
        match self {
            Self::Bool => FieldValue::Bool(false),
            Self::Int => FieldValue::Int(0),
            Self::Float => FieldValue::Float(0.0),
            Self::Text => FieldValue::Text(String::new()),
            Self::Bytes => FieldValue::Bytes(Vec::new()),
            Self::List => FieldValue::List(Vec::new()),
            Self::Nullable => FieldValue::Null,
        }
    }

    /// Check whether a value may be stored in a field of this kind
    ///
    /// `Nullable` accepts anything; every other kind accepts only its own
    /// variant.
    #[inline]
    #[must_use]
    pub fn accepts(self, value: &FieldValue) -> bool {
        match self {
            Self::Nullable => true,
            kind => value.kind() == Some(kind),
        }
    }

    /// Stable lowercase name
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::List => "list",
            Self::Nullable => "nullable",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value read from or written to a field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// Absent value
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    List(Vec<FieldValue>),
}

impl FieldValue {
    /// Kind of this value, `None` for `Null`
    #[inline]
    #[must_use]
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(ValueKind::Bool),
            Self::Int(_) => Some(ValueKind::Int),
            Self::Float(_) => Some(ValueKind::Float),
            Self::Text(_) => Some(ValueKind::Text),
            Self::Bytes(_) => Some(ValueKind::Bytes),
            Self::List(_) => Some(ValueKind::List),
        }
    }

    /// Name of the value's kind (`"null"` for `Null`)
    #[inline]
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind().map_or("null", ValueKind::name)
    }

    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow text content
    #[inline]
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s:?}"),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Error converting a [`FieldValue`] into a concrete Rust type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {actual} value into {expected}")]
pub struct ValueConversionError {
    pub expected: ValueKind,
    pub actual: &'static str,
}

macro_rules! scalar_conversions {
    ($($ty:ty => $variant:ident, $kind:ident;)*) => {
        $(
            impl From<$ty> for FieldValue {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }

            impl TryFrom<FieldValue> for $ty {
                type Error = ValueConversionError;

                fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
                    match value {
                        FieldValue::$variant(v) => Ok(v),
                        other => Err(ValueConversionError {
                            expected: ValueKind::$kind,
                            actual: other.kind_name(),
                        }),
                    }
                }
            }
        )*
    };
}

scalar_conversions! {
    bool => Bool, Bool;
    i64 => Int, Int;
    f64 => Float, Float;
    String => Text, Text;
    Vec<u8> => Bytes, Bytes;
    Vec<FieldValue> => List, List;
}

impl From<i32> for FieldValue {
    #[inline]
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<&str> for FieldValue {
    #[inline]
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    #[inline]
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl TryFrom<FieldValue> for Option<String> {
    type Error = ValueConversionError;

    fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
        match value {
            FieldValue::Null => Ok(None),
            other => String::try_from(other).map(Some),
        }
    }
}

impl TryFrom<FieldValue> for Option<i64> {
    type Error = ValueConversionError;

    fn try_from(value: FieldValue) -> Result<Self, Self::Error> {
        match value {
            FieldValue::Null => Ok(None),
            other => i64::try_from(other).map(Some),
        }
    }
}
