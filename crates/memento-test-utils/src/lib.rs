//! Testing utilities for the memento workspace
//!
//! Fixture models and a tracing initializer shared by tests.
//!
//! - [`Person`]: two stored names and a computed, access-counted full name
//! - [`Account`]: one field of every capability shape, with read/write counters
//! - [`Flaky`]: fields whose getter or setter always fails

#![allow(missing_docs)]

use memento_model::{AccessError, FieldDescriptor, FieldTable, FieldValue, Model, ValueKind};
use once_cell::sync::Lazy;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

static PERSON_FIELDS: Lazy<FieldTable> = Lazy::new(|| {
    FieldTable::builder("Person")
        .field(FieldDescriptor::plain("first_name", ValueKind::Text))
        .field(FieldDescriptor::plain("last_name", ValueKind::Text))
        .field(FieldDescriptor::computed("full_name", ValueKind::Text))
        .build()
        .unwrap()
});

/// Person with a computed full name that counts its reads
#[derive(Debug, Default)]
pub struct Person {
    first_name: String,
    last_name: String,
    full_name_reads: Cell<usize>,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            full_name_reads: Cell::new(0),
        }
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Computes the full name and bumps the access counter
    pub fn full_name(&self) -> String {
        self.full_name_reads.set(self.full_name_reads.get() + 1);
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn full_name_reads(&self) -> usize {
        self.full_name_reads.get()
    }
}

impl Model for Person {
    fn field_table() -> &'static FieldTable {
        &PERSON_FIELDS
    }

    fn shell() -> Self {
        Self::default()
    }

    fn read_field(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError> {
        match field.name() {
            "first_name" => Ok(self.first_name.clone().into()),
            "last_name" => Ok(self.last_name.clone().into()),
            "full_name" => Ok(self.full_name().into()),
            other => Err(AccessError::unknown_field("Person", other)),
        }
    }

    fn write_field(&mut self, field: &FieldDescriptor, value: FieldValue) -> Result<(), AccessError> {
        match field.name() {
            "first_name" => self.first_name = AccessError::convert(field, value)?,
            "last_name" => self.last_name = AccessError::convert(field, value)?,
            "full_name" => return Err(AccessError::NotWritable("full_name")),
            other => return Err(AccessError::unknown_field("Person", other)),
        }
        Ok(())
    }
}

static ACCOUNT_FIELDS: Lazy<FieldTable> = Lazy::new(|| {
    FieldTable::builder("Account")
        .field(FieldDescriptor::read_only("id", ValueKind::Int))
        .field(FieldDescriptor::plain("owner", ValueKind::Text))
        .field(FieldDescriptor::lazy("balance", ValueKind::Int))
        .field(FieldDescriptor::plain("pin", ValueKind::Int))
        .field(FieldDescriptor::lazy("nickname", ValueKind::Nullable))
        .field(FieldDescriptor::computed("audit_log", ValueKind::List).tagged())
        .build()
        .unwrap()
});

/// Account covering every capability shape
///
/// | field       | shape                        |
/// |-------------|------------------------------|
/// | `id`        | read-only, stored            |
/// | `owner`     | read-write, stored           |
/// | `balance`   | read-write, dispatch         |
/// | `pin`       | read-write, stored           |
/// | `nickname`  | read-write, dispatch, nullable |
/// | `audit_log` | read-only, dispatch, tagged  |
///
/// Every `read_field`/`write_field` call is counted per field name.
#[derive(Debug, Default)]
pub struct Account {
    id: i64,
    owner: String,
    balance: i64,
    pin: i64,
    nickname: Option<String>,
    reads: RefCell<HashMap<&'static str, usize>>,
    writes: HashMap<&'static str, usize>,
}

impl Account {
    pub fn new(id: i64, owner: &str, balance: i64) -> Self {
        Self {
            id,
            owner: owner.to_string(),
            balance,
            pin: 1234,
            nickname: Some(format!("{owner}'s account")),
            ..Self::default()
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn pin(&self) -> i64 {
        self.pin
    }

    pub fn nickname(&self) -> Option<&str> {
        self.nickname.as_deref()
    }

    pub fn read_count(&self, name: &str) -> usize {
        self.reads.borrow().get(name).copied().unwrap_or(0)
    }

    pub fn write_count(&self, name: &str) -> usize {
        self.writes.get(name).copied().unwrap_or(0)
    }
}

impl Model for Account {
    fn field_table() -> &'static FieldTable {
        &ACCOUNT_FIELDS
    }

    fn shell() -> Self {
        Self::default()
    }

    fn read_field(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError> {
        *self.reads.borrow_mut().entry(field.name()).or_insert(0) += 1;
        match field.name() {
            "id" => Ok(self.id.into()),
            "owner" => Ok(self.owner.clone().into()),
            "balance" => Ok(self.balance.into()),
            "pin" => Ok(self.pin.into()),
            "nickname" => Ok(self.nickname.clone().into()),
            "audit_log" => Ok(FieldValue::List(vec![
                format!("opened by {}", self.owner).into(),
                format!("balance {}", self.balance).into(),
            ])),
            other => Err(AccessError::unknown_field("Account", other)),
        }
    }

    fn write_field(&mut self, field: &FieldDescriptor, value: FieldValue) -> Result<(), AccessError> {
        *self.writes.entry(field.name()).or_insert(0) += 1;
        match field.name() {
            "owner" => self.owner = AccessError::convert(field, value)?,
            "balance" => self.balance = AccessError::convert(field, value)?,
            "pin" => self.pin = AccessError::convert(field, value)?,
            "nickname" => self.nickname = AccessError::convert(field, value)?,
            "id" | "audit_log" => return Err(AccessError::NotWritable(field.name())),
            other => return Err(AccessError::unknown_field("Account", other)),
        }
        Ok(())
    }
}

static FLAKY_FIELDS: Lazy<FieldTable> = Lazy::new(|| {
    FieldTable::builder("Flaky")
        .field(FieldDescriptor::plain("broken_getter", ValueKind::Text))
        .field(FieldDescriptor::plain("broken_setter", ValueKind::Text))
        .field(FieldDescriptor::lazy("broken_lazy", ValueKind::Text))
        .field(FieldDescriptor::plain("healthy", ValueKind::Text))
        .build()
        .unwrap()
});

/// Model whose `broken_*` accessors always fail
#[derive(Debug, Default)]
pub struct Flaky {
    healthy: String,
}

impl Flaky {
    pub fn new() -> Self {
        Self {
            healthy: "fine".to_string(),
        }
    }
}

impl Model for Flaky {
    fn field_table() -> &'static FieldTable {
        &FLAKY_FIELDS
    }

    fn shell() -> Self {
        Self::default()
    }

    fn read_field(&self, field: &FieldDescriptor) -> Result<FieldValue, AccessError> {
        match field.name() {
            "broken_getter" | "broken_lazy" => {
                Err(AccessError::failed(field.name(), "getter failed"))
            }
            "broken_setter" => Ok("readable".into()),
            "healthy" => Ok(self.healthy.clone().into()),
            other => Err(AccessError::unknown_field("Flaky", other)),
        }
    }

    fn write_field(&mut self, field: &FieldDescriptor, value: FieldValue) -> Result<(), AccessError> {
        match field.name() {
            "broken_setter" => Err(AccessError::failed(field.name(), "setter failed")),
            "broken_getter" | "broken_lazy" => Ok(()),
            "healthy" => {
                self.healthy = AccessError::convert(field, value)?;
                Ok(())
            }
            other => Err(AccessError::unknown_field("Flaky", other)),
        }
    }
}
