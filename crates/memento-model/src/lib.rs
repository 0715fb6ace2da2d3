//! Memento Model Layer
//!
//! Field descriptors, dynamic values and the access traits a type
//! implements to be mirrored by a memento.
//!
//! # Core Concepts
//!
//! - [`Model`]: Trait a source type implements (field table + getters/setters)
//! - [`FieldTable`]: Ordered descriptor table registered once per type
//! - [`FieldDescriptor`]: Name, [`ValueKind`] and [`Capabilities`] of a field
//! - [`FieldValue`]: Dynamic value crossing the field-access boundary
//! - [`FieldAccess`]: Name-based read/write shared by models and mementos
//!
//! # Example
//!
//! ```rust,ignore
//! use memento_model::{FieldAccess, FieldAccessExt};
//!
//! let mut person = Person::new("Rafael", "Salguero");
//! person.set_as("first_name", "Alejandra")?;
//! let full: String = person.get_as("full_name")?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod descriptor;
mod model;
mod table;
mod value;

pub use descriptor::{Capabilities, FieldDescriptor};
pub use model::{AccessError, FieldAccess, FieldAccessExt, Model};
pub use table::{FieldTable, FieldTableBuilder, TableError};
pub use value::{FieldValue, ValueConversionError, ValueKind};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
