//! Domain entities and the table metadata each one maps to.

mod brand;
mod city;
mod dependent;
mod person;
mod product;

pub use brand::{Brand, BrandFilter, BrandInput, BRANDS};
pub use city::{City, CityFilter, CityInput, CITIES};
pub use dependent::{Dependent, DependentFilter, DependentInput, DEPENDENTS};
pub use person::{Person, PersonFilter, PersonInput, PEOPLE};
pub use product::{Product, ProductFilter, ProductInput, PRODUCTS};

use crate::error::AppError;
use crate::sql::{BindValue, Table};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A foreign key held by a row: the parent table and the referenced id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    pub table: &'static str,
    pub id: i32,
}

/// A persisted entity with an integer primary key and store-maintained timestamps.
pub trait Entity: Clone + Serialize + Send + Sync + Unpin + 'static {
    /// Writable fields accepted on create and update.
    type Input: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Name used in error messages.
    const NAME: &'static str;
    const TABLE: &'static Table;

    fn id(&self) -> i32;

    fn created_at(&self) -> DateTime<Utc>;

    fn validate(input: &Self::Input) -> Result<(), AppError>;

    /// Values for `TABLE.columns`, in the same order.
    fn input_values(input: &Self::Input) -> Vec<BindValue>;

    fn from_input(
        id: i32,
        input: Self::Input,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;

    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Column values that must be unique across the table, when present.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
