//! Produtos e Pessoas: REST backend for products, brands, people, dependents and cities
//! over PostgreSQL with JWT bearer authentication.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod repository;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{AppError, ConfigError};
pub use migration::apply_migrations;
pub use repository::{MemoryStore, PgStore};
pub use routes::{app, common_routes, docs_routes, entity_routes};
pub use state::AppState;
pub use store::{connect, ensure_database_exists};
