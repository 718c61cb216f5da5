//! Shared application state: repository bindings, token service and settings.

use crate::auth::TokenService;
use crate::config::Config;
use crate::repository::{
    BrandRepository, CityRepository, DependentRepository, HealthCheck, MemoryStore,
    PersonRepository, PgStore, ProductRepository,
};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductRepository>,
    pub brands: Arc<dyn BrandRepository>,
    pub people: Arc<dyn PersonRepository>,
    pub dependents: Arc<dyn DependentRepository>,
    pub cities: Arc<dyn CityRepository>,
    pub health: Arc<dyn HealthCheck>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Bind every repository to the PostgreSQL implementation over `pool`.
    pub fn postgres(pool: PgPool, config: Config) -> Self {
        Self::with_store(Arc::new(PgStore::new(pool)), config)
    }

    /// Bind every repository to a fresh in-memory store.
    pub fn in_memory(config: Config) -> Self {
        Self::with_store(Arc::new(MemoryStore::new()), config)
    }

    fn with_store<S>(store: Arc<S>, config: Config) -> Self
    where
        S: ProductRepository
            + BrandRepository
            + PersonRepository
            + DependentRepository
            + CityRepository
            + HealthCheck
            + 'static,
    {
        AppState {
            products: store.clone(),
            brands: store.clone(),
            people: store.clone(),
            dependents: store.clone(),
            cities: store.clone(),
            health: store,
            tokens: Arc::new(TokenService::new(&config.jwt)),
            config: Arc::new(config),
        }
    }
}
