//! Binds each entity to its repository in [`AppState`] and to its list filter.

use crate::error::AppError;
use crate::model::{
    Brand, BrandFilter, City, CityFilter, Dependent, DependentFilter, Entity, Person,
    PersonFilter, Product, ProductFilter,
};
use crate::state::AppState;
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// An entity exposed over HTTP.
#[async_trait]
pub trait Resource: Entity {
    /// Query-string filter accepted by the list route.
    type Filter: DeserializeOwned + Send + 'static;

    async fn list(state: &AppState, filter: Self::Filter) -> Result<Vec<Self>, AppError>;
    async fn get(state: &AppState, id: i32) -> Result<Option<Self>, AppError>;
    async fn create(state: &AppState, input: Self::Input) -> Result<Self, AppError>;
    async fn update(state: &AppState, id: i32, input: Self::Input) -> Result<Self, AppError>;
    async fn delete(state: &AppState, id: i32) -> Result<bool, AppError>;
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

macro_rules! resource {
    ($entity:ty, $repo:ident, $filter:ty, |$state:ident, $f:ident| $list:block) => {
        #[async_trait]
        impl Resource for $entity {
            type Filter = $filter;

            async fn list($state: &AppState, $f: $filter) -> Result<Vec<Self>, AppError> $list

            async fn get(state: &AppState, id: i32) -> Result<Option<Self>, AppError> {
                state.$repo.find_by_id(id).await
            }

            async fn create(state: &AppState, input: Self::Input) -> Result<Self, AppError> {
                state.$repo.add(input).await
            }

            async fn update(
                state: &AppState,
                id: i32,
                input: Self::Input,
            ) -> Result<Self, AppError> {
                state.$repo.update(id, input).await
            }

            async fn delete(state: &AppState, id: i32) -> Result<bool, AppError> {
                state.$repo.delete(id).await
            }
        }
    };
}

resource!(Product, products, ProductFilter, |state, filter| {
    if let Some(brand_id) = filter.brand_id {
        return state.products.find_by_brand(brand_id).await;
    }
    match non_blank(filter.brand_description) {
        Some(text) => state.products.find_by_brand_description(&text).await,
        None => state.products.find_all().await,
    }
});

resource!(Brand, brands, BrandFilter, |state, filter| {
    match non_blank(filter.description) {
        Some(text) => state.brands.find_by_description(&text).await,
        None => state.brands.find_all().await,
    }
});

resource!(Person, people, PersonFilter, |state, filter| {
    match filter.city_id {
        Some(city_id) => state.people.find_by_city(city_id).await,
        None => state.people.find_all().await,
    }
});

resource!(Dependent, dependents, DependentFilter, |state, filter| {
    match filter.person_id {
        Some(person_id) => state.dependents.find_by_person(person_id).await,
        None => state.dependents.find_all().await,
    }
});

resource!(City, cities, CityFilter, |state, filter| {
    match non_blank(filter.state) {
        Some(uf) => state.cities.find_by_state(&uf).await,
        None => state.cities.find_all().await,
    }
});
