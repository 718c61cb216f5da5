use super::{Entity, Reference, PEOPLE};
use crate::error::AppError;
use crate::sql::{BindValue, Table};
use crate::validation;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const DEPENDENTS: Table = Table {
    name: "dependents",
    pk: "id",
    columns: &["name", "birth_date", "person_id"],
};

/// Dependent (dependente) of a person.
#[derive(Clone, Debug, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dependent {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "João da Silva")]
    pub name: String,
    #[schema(example = "2015-03-21")]
    pub birth_date: Option<NaiveDate>,
    #[schema(example = 1)]
    pub person_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DependentInput {
    #[schema(example = "João da Silva")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "2015-03-21")]
    pub birth_date: Option<NaiveDate>,
    #[schema(example = 1)]
    pub person_id: i32,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependentFilter {
    pub person_id: Option<i32>,
}

impl Entity for Dependent {
    type Input = DependentInput;

    const NAME: &'static str = "Dependent";
    const TABLE: &'static Table = &DEPENDENTS;

    fn id(&self) -> i32 {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn validate(input: &DependentInput) -> Result<(), AppError> {
        validation::required_text("name", &input.name, 150)?;
        if let Some(birth) = input.birth_date {
            if birth > Utc::now().date_naive() {
                return Err(AppError::Validation(
                    "birthDate must not be in the future".into(),
                ));
            }
        }
        validation::reference("personId", input.person_id)
    }

    fn input_values(input: &DependentInput) -> Vec<BindValue> {
        vec![
            BindValue::Text(input.name.trim().to_string()),
            BindValue::OptDate(input.birth_date),
            BindValue::Int(input.person_id),
        ]
    }

    fn from_input(
        id: i32,
        input: DependentInput,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Dependent {
            id,
            name: input.name.trim().to_string(),
            birth_date: input.birth_date,
            person_id: input.person_id,
            created_at,
            updated_at,
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![Reference {
            table: PEOPLE.name,
            id: self.person_id,
        }]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn future_birth_date_is_rejected() {
        let tomorrow = Utc::now().date_naive() + chrono::Duration::days(2);
        let input = DependentInput {
            name: "João".into(),
            birth_date: Some(tomorrow),
            person_id: 1,
        };
        assert!(Dependent::validate(&input).is_err());
    }

    #[test]
    fn birth_date_parses_iso() {
        let input: DependentInput =
            serde_json::from_str(r#"{"name":"João","birthDate":"2015-03-21","personId":4}"#)
                .unwrap();
        assert_eq!(input.birth_date, NaiveDate::from_ymd_opt(2015, 3, 21));
    }
}
