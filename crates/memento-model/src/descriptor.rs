//! Field descriptors
//!
//! A [`FieldDescriptor`] names a field, declares its [`ValueKind`] and
//! carries the [`Capabilities`] that decide how a memento treats it.
//! Descriptors are `const`-constructible so models can register them in
//! statics.

use crate::value::ValueKind;
use std::fmt::{self, Display, Formatter};

/// Capability flags of a field
///
/// - `readable` / `writable`: the model exposes a getter / setter
/// - `dispatch`: access goes through the model's dispatch table and can be
///   intercepted by a memento (lazy or computed fields)
/// - `tagged`: explicitly marked for inclusion by the model author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capabilities {
    readable: bool,
    writable: bool,
    dispatch: bool,
    tagged: bool,
}

impl Capabilities {
    /// No capabilities
    pub const NONE: Self = Self {
        readable: false,
        writable: false,
        dispatch: false,
        tagged: false,
    };

    /// Getter only
    #[inline]
    #[must_use]
    pub const fn read_only() -> Self {
        Self {
            readable: true,
            ..Self::NONE
        }
    }

    /// Getter and setter
    #[inline]
    #[must_use]
    pub const fn read_write() -> Self {
        Self {
            readable: true,
            writable: true,
            ..Self::NONE
        }
    }

    /// Setter only
    #[inline]
    #[must_use]
    pub const fn write_only() -> Self {
        Self {
            writable: true,
            ..Self::NONE
        }
    }

    /// Mark access as interceptable
    #[inline]
    #[must_use]
    pub const fn with_dispatch(mut self) -> Self {
        self.dispatch = true;
        self
    }

    /// Mark for explicit inclusion
    #[inline]
    #[must_use]
    pub const fn with_tag(mut self) -> Self {
        self.tagged = true;
        self
    }

    #[inline]
    #[must_use]
    pub const fn is_readable(self) -> bool {
        self.readable
    }

    #[inline]
    #[must_use]
    pub const fn is_writable(self) -> bool {
        self.writable
    }

    #[inline]
    #[must_use]
    pub const fn is_dispatch(self) -> bool {
        self.dispatch
    }

    #[inline]
    #[must_use]
    pub const fn is_tagged(self) -> bool {
        self.tagged
    }

    /// Readable but not writable
    #[inline]
    #[must_use]
    pub const fn is_read_only(self) -> bool {
        self.readable && !self.writable
    }
}

impl Display for Capabilities {
    /// Compact `rwdt` flag string, `-` for unset flags
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            flag(self.readable, 'r'),
            flag(self.writable, 'w'),
            flag(self.dispatch, 'd'),
            flag(self.tagged, 't'),
        )
    }
}

/// Descriptor of a single model field
///
/// # Examples
/// ```
/// use memento_model::{FieldDescriptor, ValueKind};
///
/// const FULL_NAME: FieldDescriptor = FieldDescriptor::computed("full_name", ValueKind::Text);
/// assert!(FULL_NAME.is_dispatch());
/// assert!(FULL_NAME.capabilities().is_read_only());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    name: &'static str,
    kind: ValueKind,
    capabilities: Capabilities,
}

impl FieldDescriptor {
    /// Create descriptor with explicit capabilities
    #[inline]
    #[must_use]
    pub const fn new(name: &'static str, kind: ValueKind, capabilities: Capabilities) -> Self {
        Self {
            name,
            kind,
            capabilities,
        }
    }

    /// Plain stored field: read-write, not interceptable
    #[inline]
    #[must_use]
    pub const fn plain(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, kind, Capabilities::read_write())
    }

    /// Read-only, not interceptable (cannot be mirrored by a memento)
    #[inline]
    #[must_use]
    pub const fn read_only(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, kind, Capabilities::read_only())
    }

    /// Read-only, interceptable (computed on access)
    #[inline]
    #[must_use]
    pub const fn computed(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, kind, Capabilities::read_only().with_dispatch())
    }

    /// Read-write, interceptable (lazy-loaded)
    #[inline]
    #[must_use]
    pub const fn lazy(name: &'static str, kind: ValueKind) -> Self {
        Self::new(name, kind, Capabilities::read_write().with_dispatch())
    }

    /// Same descriptor, tagged for explicit inclusion
    #[inline]
    #[must_use]
    pub const fn tagged(mut self) -> Self {
        self.capabilities = self.capabilities.with_tag();
        self
    }

    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    #[inline]
    #[must_use]
    pub const fn is_readable(&self) -> bool {
        self.capabilities.is_readable()
    }

    #[inline]
    #[must_use]
    pub const fn is_writable(&self) -> bool {
        self.capabilities.is_writable()
    }

    #[inline]
    #[must_use]
    pub const fn is_dispatch(&self) -> bool {
        self.capabilities.is_dispatch()
    }

    #[inline]
    #[must_use]
    pub const fn is_tagged(&self) -> bool {
        self.capabilities.is_tagged()
    }
}

impl Display for FieldDescriptor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} [{}]", self.name, self.kind, self.capabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorthand_constructors() {
        let plain = FieldDescriptor::plain("first_name", ValueKind::Text);
        assert!(plain.is_readable() && plain.is_writable() && !plain.is_dispatch());

        let lazy = FieldDescriptor::lazy("orders", ValueKind::List);
        assert!(lazy.is_writable() && lazy.is_dispatch());

        let ro = FieldDescriptor::read_only("id", ValueKind::Int);
        assert!(ro.capabilities().is_read_only());
        assert!(!ro.is_dispatch());
    }

    #[test]
    fn tagging_preserves_other_flags() {
        let d = FieldDescriptor::computed("audit", ValueKind::Text).tagged();
        assert!(d.is_tagged());
        assert!(d.is_dispatch());
        assert!(!d.is_writable());
    }

    #[test]
    fn display_flags() {
        let d = FieldDescriptor::lazy("orders", ValueKind::List).tagged();
        assert_eq!(d.to_string(), "orders: list [rwdt]");
        assert_eq!(Capabilities::write_only().to_string(), "-w--");
    }
}
