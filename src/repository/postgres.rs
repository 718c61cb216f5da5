//! Repositories backed by PostgreSQL through a shared pool.

use super::{
    BrandRepository, CityRepository, DependentRepository, HealthCheck, PersonRepository,
    ProductRepository, Repository,
};
use crate::error::{from_db, AppError};
use crate::model::{
    Brand, City, Dependent, Entity, Person, Product, BRANDS, CITIES, DEPENDENTS, PEOPLE, PRODUCTS,
};
use crate::sql::{self, bind_all, contains_pattern, BindValue};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_many<E>(&self, sql: &str, values: Vec<BindValue>) -> Result<Vec<E>, AppError>
    where
        E: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %sql, params = ?values, "query");
        bind_all(sqlx::query_as::<_, E>(sql), values)
            .fetch_all(&self.pool)
            .await
            .map_err(from_db)
    }

    async fn fetch_optional<E>(
        &self,
        sql: &str,
        values: Vec<BindValue>,
    ) -> Result<Option<E>, AppError>
    where
        E: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        tracing::debug!(sql = %sql, params = ?values, "query");
        bind_all(sqlx::query_as::<_, E>(sql), values)
            .fetch_optional(&self.pool)
            .await
            .map_err(from_db)
    }
}

#[async_trait]
impl<E> Repository<E> for PgStore
where
    E: Entity + for<'r> FromRow<'r, PgRow>,
{
    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        let sql = sql::select_all(E::TABLE);
        self.fetch_many(&sql, Vec::new()).await
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<E>, AppError> {
        let sql = sql::select_by_id(E::TABLE);
        self.fetch_optional(&sql, vec![BindValue::Int(id)]).await
    }

    async fn add(&self, input: E::Input) -> Result<E, AppError> {
        E::validate(&input)?;
        let sql = sql::insert(E::TABLE);
        self.fetch_optional(&sql, E::input_values(&input))
            .await?
            .ok_or(AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn update(&self, id: i32, input: E::Input) -> Result<E, AppError> {
        if Repository::<E>::find_by_id(self, id).await?.is_none() {
            return Err(AppError::missing(E::NAME, id));
        }
        E::validate(&input)?;
        let sql = sql::update(E::TABLE);
        let mut values = E::input_values(&input);
        values.push(BindValue::Int(id));
        self.fetch_optional(&sql, values)
            .await?
            .ok_or_else(|| AppError::missing(E::NAME, id))
    }

    async fn delete(&self, id: i32) -> Result<bool, AppError> {
        let sql = sql::delete(E::TABLE);
        tracing::debug!(sql = %sql, id, "query");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(from_db)?;
        if result.rows_affected() == 0 {
            return Err(AppError::missing(E::NAME, id));
        }
        Ok(true)
    }
}

#[async_trait]
impl ProductRepository for PgStore {
    async fn find_by_brand(&self, brand_id: i32) -> Result<Vec<Product>, AppError> {
        let sql = sql::select_by_column(&PRODUCTS, "brand_id");
        self.fetch_many(&sql, vec![BindValue::Int(brand_id)]).await
    }

    async fn find_by_brand_description(&self, text: &str) -> Result<Vec<Product>, AppError> {
        let sql = sql::select_by_parent_contains(&PRODUCTS, "brand_id", &BRANDS, "description");
        self.fetch_many(&sql, vec![BindValue::Text(contains_pattern(text))])
            .await
    }
}

#[async_trait]
impl BrandRepository for PgStore {
    async fn find_by_description(&self, text: &str) -> Result<Vec<Brand>, AppError> {
        let sql = sql::select_by_column_contains(&BRANDS, "description");
        self.fetch_many(&sql, vec![BindValue::Text(contains_pattern(text))])
            .await
    }
}

#[async_trait]
impl PersonRepository for PgStore {
    async fn find_by_city(&self, city_id: i32) -> Result<Vec<Person>, AppError> {
        let sql = sql::select_by_column(&PEOPLE, "city_id");
        self.fetch_many(&sql, vec![BindValue::Int(city_id)]).await
    }
}

#[async_trait]
impl DependentRepository for PgStore {
    async fn find_by_person(&self, person_id: i32) -> Result<Vec<Dependent>, AppError> {
        let sql = sql::select_by_column(&DEPENDENTS, "person_id");
        self.fetch_many(&sql, vec![BindValue::Int(person_id)]).await
    }
}

#[async_trait]
impl CityRepository for PgStore {
    async fn find_by_state(&self, state: &str) -> Result<Vec<City>, AppError> {
        let sql = sql::select_by_column(&CITIES, "state");
        self.fetch_many(&sql, vec![BindValue::Text(state.trim().to_uppercase())])
            .await
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
