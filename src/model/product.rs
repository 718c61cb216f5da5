use super::{Entity, Reference, BRANDS};
use crate::error::AppError;
use crate::sql::{BindValue, Table};
use crate::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const PRODUCTS: Table = Table {
    name: "products",
    pk: "id",
    columns: &["description", "stock", "brand_id"],
};

/// Product (produto) with its stock quantity, belonging to a brand.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Panela de pressão 4,5L")]
    pub description: String,
    #[schema(example = 12)]
    pub stock: i32,
    #[schema(example = 1)]
    pub brand_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[schema(example = "Panela de pressão 4,5L")]
    pub description: String,
    #[serde(default)]
    #[schema(example = 12)]
    pub stock: i32,
    #[schema(example = 1)]
    pub brand_id: i32,
}

/// `?brandId=` lists a brand's products; `?brandDescription=` matches on the brand's description.
/// `brandId` wins when both are present.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    pub brand_id: Option<i32>,
    pub brand_description: Option<String>,
}

impl Entity for Product {
    type Input = ProductInput;

    const NAME: &'static str = "Product";
    const TABLE: &'static Table = &PRODUCTS;

    fn id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(input: &ProductInput) -> Result<(), AppError> {
        validation::required_text("description", &input.description, 200)?;
        validation::minimum("stock", input.stock, 0)?;
        validation::reference("brandId", input.brand_id)
    }

    fn input_values(input: &ProductInput) -> Vec<BindValue> {
        vec![
            BindValue::Text(input.description.trim().to_string()),
            BindValue::Int(input.stock),
            BindValue::Int(input.brand_id),
        ]
    }

    fn from_input(
        id: i32,
        input: ProductInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Product {
            id,
            description: input.description.trim().to_string(),
            stock: input.stock,
            brand_id: input.brand_id,
            created_at,
            updated_at,
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference {
            table: BRANDS.name,
            id: self.brand_id,
        }]
    }
}
