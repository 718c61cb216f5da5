//! In-process store with the same integrity rules as the database schema.
//! Backs tests and local runs without PostgreSQL.

use super::{
    BrandRepository, CityRepository, DependentRepository, HealthCheck, PersonRepository,
    ProductRepository, Repository,
};
use crate::error::AppError;
use crate::model::{Brand, City, Dependent, Entity, Person, Product, Reference};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
pub struct Tables {
    brands: BTreeMap<i32, Brand>,
    products: BTreeMap<i32, Product>,
    cities: BTreeMap<i32, City>,
    people: BTreeMap<i32, Person>,
    dependents: BTreeMap<i32, Dependent>,
    sequences: HashMap<&'static str, i32>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i32 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    fn exists(&self, r: &Reference) -> bool {
        match r.table {
            "brands" => self.brands.contains_key(&r.id),
            "products" => self.products.contains_key(&r.id),
            "cities" => self.cities.contains_key(&r.id),
            "people" => self.people.contains_key(&r.id),
            "dependents" => self.dependents.contains_key(&r.id),
            _ => false,
        }
    }

    fn is_referenced(&self, target: &Reference) -> bool {
        fn any_ref<E: Entity>(rows: &BTreeMap<i32, E>, target: &Reference) -> bool {
            rows.values().any(|row| row.references().contains(target))
        }
        any_ref(&self.brands, target)
            || any_ref(&self.products, target)
            || any_ref(&self.cities, target)
            || any_ref(&self.people, target)
            || any_ref(&self.dependents, target)
    }

    /// Foreign keys must resolve and unique keys must not collide with another row.
    fn check<E: MemoryEntity>(&self, row: &E) -> Result<(), AppError> {
        for r in row.references() {
            if !self.exists(&r) {
                return Err(AppError::Conflict(format!(
                    "referenced row is missing ({} {})",
                    r.table, r.id
                )));
            }
        }
        let keys = row.unique_keys();
        if keys.is_empty() {
            return Ok(());
        }
        let taken = E::rows(self)
            .values()
            .filter(|other| other.id() != row.id())
            .flat_map(|other| other.unique_keys())
            .find(|k| keys.contains(k));
        if let Some((column, value)) = taken {
            return Err(AppError::Conflict(format!(
                "duplicate value ({}.{} = {})",
                E::TABLE.name,
                column,
                value
            )));
        }
        Ok(())
    }
}

/// Maps an entity to its in-memory table.
pub trait MemoryEntity: Entity {
    fn rows(tables: &Tables) -> &BTreeMap<i32, Self>;
    fn rows_mut(tables: &mut Tables) -> &mut BTreeMap<i32, Self>;
}

macro_rules! memory_entity {
    ($ty:ty, $field:ident) => {
        impl MemoryEntity for $ty {
            fn rows(tables: &Tables) -> &BTreeMap<i32, Self> {
                &tables.$field
            }

            fn rows_mut(tables: &mut Tables) -> &mut BTreeMap<i32, Self> {
                &mut tables.$field
            }
        }
    };
}

memory_entity!(Brand, brands);
memory_entity!(Product, products);
memory_entity!(City, cities);
memory_entity!(Person, people);
memory_entity!(Dependent, dependents);

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn filter<E, F>(&self, pred: F) -> Result<Vec<E>, AppError>
    where
        E: MemoryEntity,
        F: Fn(&E) -> bool,
    {
        let tables = self.read()?;
        Ok(E::rows(&tables).values().filter(|r| pred(r)).cloned().collect())
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl<E: MemoryEntity> Repository<E> for MemoryStore {
    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        self.filter(|_: &E| true)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<E>, AppError> {
        let tables = self.read()?;
        Ok(E::rows(&tables).get(&id).cloned())
    }

    async fn add(&self, input: E::Input) -> Result<E, AppError> {
        E::validate(&input)?;
        let mut tables = self.write()?;
        let id = tables.next_id(E::TABLE.name);
        let now = Utc::now();
        let row = E::from_input(id, input, now, now);
        tables.check(&row)?;
        E::rows_mut(&mut tables).insert(id, row.clone());
        tracing::debug!(table = E::TABLE.name, id, "inserted");
        Ok(row)
    }

    async fn update(&self, id: i32, input: E::Input) -> Result<E, AppError> {
        let mut tables = self.write()?;
        let created_at = E::rows(&tables)
            .get(&id)
            .map(|existing| existing.created_at())
            .ok_or_else(|| AppError::missing(E::NAME, id))?;
        E::validate(&input)?;
        let row = E::from_input(id, input, created_at, Utc::now());
        tables.check(&row)?;
        E::rows_mut(&mut tables).insert(id, row.clone());
        tracing::debug!(table = E::TABLE.name, id, "updated");
        Ok(row)
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        if !E::rows(&tables).contains_key(&id) {
            return Err(AppError::missing(E::NAME, id));
        }
        let target = Reference {
            table: E::TABLE.name,
            id,
        };
        if tables.is_referenced(&target) {
            return Err(AppError::Conflict(format!(
                "{} {} is still referenced",
                E::NAME,
                id
            )));
        }
        E::rows_mut(&mut tables).remove(&id);
        tracing::debug!(table = E::TABLE.name, id, "deleted");
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn find_by_brand(&self, brand_id: i32) -> Result<Vec<Product>, AppError> {
        self.filter(|p: &Product| p.brand_id == brand_id)
    }

    async fn find_by_brand_description(&self, text: &str) -> Result<Vec<Product>, AppError> {
        let tables = self.read()?;
        Ok(tables
            .products
            .values()
            .filter(|p| {
                tables
                    .brands
                    .get(&p.brand_id)
                    .is_some_and(|b| contains_ignore_case(&b.description, text))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BrandRepository for MemoryStore {
    async fn find_by_description(&self, text: &str) -> Result<Vec<Brand>, AppError> {
        self.filter(|b: &Brand| contains_ignore_case(&b.description, text))
    }
}

#[async_trait]
impl PersonRepository for MemoryStore {
    async fn find_by_city(&self, city_id: i32) -> Result<Vec<Person>, AppError> {
        self.filter(|p: &Person| p.city_id == city_id)
    }
}

#[async_trait]
impl DependentRepository for MemoryStore {
    async fn find_by_person(&self, person_id: i32) -> Result<Vec<Dependent>, AppError> {
        self.filter(|d: &Dependent| d.person_id == person_id)
    }
}

#[async_trait]
impl CityRepository for MemoryStore {
    async fn find_by_state(&self, state: &str) -> Result<Vec<City>, AppError> {
        let state = state.trim().to_uppercase();
        self.filter(|c: &City| c.state == state)
    }
}

#[async_trait]
impl HealthCheck for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
