//! Repository interfaces, one per entity, with PostgreSQL and in-memory implementations.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::{Brand, City, Dependent, Entity, Person, Product};
use async_trait::async_trait;

/// CRUD operations shared by every entity.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// All rows ordered by id.
    async fn find_all(&self) -> Result<Vec<E>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<E>, AppError>;

    /// Validate and insert; the store assigns the id.
    async fn add(&self, input: E::Input) -> Result<E, AppError>;

    /// Replace the writable fields of row `id`. Fails with NotFound when the row is absent.
    async fn update(&self, id: i32, input: E::Input) -> Result<E, AppError>;

    /// Remove row `id`. Fails with NotFound when the row is absent.
    async fn delete(&self, id: i32) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProductRepository: Repository<Product> {
    async fn find_by_brand(&self, brand_id: i32) -> Result<Vec<Product>, AppError>;

    /// Products whose brand description contains `text`, ignoring case.
    async fn find_by_brand_description(&self, text: &str) -> Result<Vec<Product>, AppError>;
}

#[async_trait]
pub trait BrandRepository: Repository<Brand> {
    async fn find_by_description(&self, text: &str) -> Result<Vec<Brand>, AppError>;
}

#[async_trait]
pub trait PersonRepository: Repository<Person> {
    async fn find_by_city(&self, city_id: i32) -> Result<Vec<Person>, AppError>;
}

#[async_trait]
pub trait DependentRepository: Repository<Dependent> {
    async fn find_by_person(&self, person_id: i32) -> Result<Vec<Dependent>, AppError>;
}

#[async_trait]
pub trait CityRepository: Repository<City> {
    /// Cities in a state (UF), matched case-insensitively.
    async fn find_by_state(&self, state: &str) -> Result<Vec<City>, AppError>;
}

/// Readiness probe for the backing store.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}
