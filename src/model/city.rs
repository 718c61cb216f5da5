use super::Entity;
use crate::error::AppError;
use crate::sql::{BindValue, Table};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const CITIES: Table = Table {
    name: "cities",
    pk: "id",
    columns: &["name", "state"],
};

const STATE_PATTERN: &str = r"^[A-Z]{2}$";

/// City (cidade) with its two-letter state abbreviation.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct City {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Campinas")]
    pub name: String,
    #[schema(example = "SP")]
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityInput {
    #[schema(example = "Campinas")]
    pub name: String,
    #[schema(example = "SP")]
    pub state: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityFilter {
    pub state: Option<String>,
}

impl Entity for City {
    type Input = CityInput;

    const NAME: &'static str = "City";
    const TABLE: &'static Table = &CITIES;

    fn id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(input: &CityInput) -> Result<(), AppError> {
        validation::required_text("name", &input.name, 120)?;
        validation::pattern("state", input.state.trim(), STATE_PATTERN)
    }

    fn input_values(input: &CityInput) -> Vec<BindValue> {
        vec![
            BindValue::Text(input.name.trim().to_string()),
            BindValue::Text(input.state.trim().to_string()),
        ]
    }

    fn from_input(
        id: i32,
        input: CityInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        City {
            id,
            name: input.name.trim().to_string(),
            state: input.state.trim().to_string(),
            created_at,
            updated_at,
        }
    }
}
