use super::{Entity, Reference, CITIES};
use crate::error::AppError;
use crate::sql::{BindValue, Table};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const PEOPLE: Table = Table {
    name: "people",
    pk: "id",
    columns: &["name", "cpf", "email", "city_id"],
};

const CPF_PATTERN: &str = r"^\d{11}$";

/// Person (pessoa) living in a city.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[schema(example = "12345678901")]
    pub cpf: Option<String>,
    #[schema(example = "maria@example.com")]
    pub email: Option<String>,
    #[schema(example = 1)]
    pub city_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersonInput {
    #[schema(example = "Maria da Silva")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "12345678901")]
    pub cpf: Option<String>,
    #[serde(default)]
    #[schema(example = "maria@example.com")]
    pub email: Option<String>,
    #[schema(example = 1)]
    pub city_id: i32,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonFilter {
    pub city_id: Option<i32>,
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl Entity for Person {
    type Input = PersonInput;

    const NAME: &'static str = "Person";
    const TABLE: &'static Table = &PEOPLE;

    fn id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(input: &PersonInput) -> Result<(), AppError> {
        validation::required_text("name", &input.name, 150)?;
        if let Some(cpf) = trimmed(&input.cpf) {
            validation::pattern("cpf", &cpf, CPF_PATTERN)?;
        }
        if let Some(email) = trimmed(&input.email) {
            validation::max_length("email", &email, 254)?;
            validation::email("email", &email)?;
        }
        validation::reference("cityId", input.city_id)
    }

    fn input_values(input: &PersonInput) -> Vec<BindValue> {
        vec![
            BindValue::Text(input.name.trim().to_string()),
            BindValue::OptText(trimmed(&input.cpf)),
            BindValue::OptText(trimmed(&input.email)),
            BindValue::Int(input.city_id),
        ]
    }

    fn from_input(
        id: i32,
        input: PersonInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Person {
            id,
            name: input.name.trim().to_string(),
            cpf: trimmed(&input.cpf),
            email: trimmed(&input.email),
            city_id: input.city_id,
            created_at,
            updated_at,
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference {
            table: CITIES.name,
            id: self.city_id,
        }]
    }

    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        self.cpf.iter().map(|cpf| ("cpf", cpf.clone())).collect()
    }
}
