use super::Entity;
use crate::error::AppError;
use crate::sql::{BindValue, Table};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const BRANDS: Table = Table {
    name: "brands",
    pk: "id",
    columns: &["description"],
};

/// Product brand (marca).
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Tramontina")]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandInput {
    #[schema(example = "Tramontina")]
    pub description: String,
}

/// `?description=` lists brands whose description contains the text.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandFilter {
    pub description: Option<String>,
}

impl Entity for Brand {
    type Input = BrandInput;

    const NAME: &'static str = "Brand";
    const TABLE: &'static Table = &BRANDS;

    fn id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(input: &BrandInput) -> Result<(), AppError> {
        validation::required_text("description", &input.description, 120)
    }

    fn input_values(input: &BrandInput) -> Vec<BindValue> {
        vec![BindValue::Text(input.description.trim().to_string())]
    }

    fn from_input(
        id: i32,
        input: BrandInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Brand {
            id,
            description: input.description.trim().to_string(),
            created_at,
            updated_at,
        }
    }
}
