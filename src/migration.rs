//! Apply the schema to the database: tables in foreign-key dependency order, then FK indexes.

use crate::error::AppError;
use sqlx::PgPool;

/// DDL for each table, parents before children. Deletes of referenced rows are restricted.
const TABLES: &[(&str, &str)] = &[
    (
        "brands",
        r#"
        CREATE TABLE IF NOT EXISTS "brands" (
            "id" SERIAL PRIMARY KEY,
            "description" VARCHAR(120) NOT NULL,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "products",
        r#"
        CREATE TABLE IF NOT EXISTS "products" (
            "id" SERIAL PRIMARY KEY,
            "description" VARCHAR(200) NOT NULL,
            "stock" INTEGER NOT NULL DEFAULT 0 CHECK ("stock" >= 0),
            "brand_id" INTEGER NOT NULL REFERENCES "brands" ("id") ON DELETE RESTRICT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "cities",
        r#"
        CREATE TABLE IF NOT EXISTS "cities" (
            "id" SERIAL PRIMARY KEY,
            "name" VARCHAR(120) NOT NULL,
            "state" CHAR(2) NOT NULL,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "people",
        r#"
        CREATE TABLE IF NOT EXISTS "people" (
            "id" SERIAL PRIMARY KEY,
            "name" VARCHAR(150) NOT NULL,
            "cpf" CHAR(11) UNIQUE,
            "email" VARCHAR(254),
            "city_id" INTEGER NOT NULL REFERENCES "cities" ("id") ON DELETE RESTRICT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "dependents",
        r#"
        CREATE TABLE IF NOT EXISTS "dependents" (
            "id" SERIAL PRIMARY KEY,
            "name" VARCHAR(150) NOT NULL,
            "birth_date" DATE,
            "person_id" INTEGER NOT NULL REFERENCES "people" ("id") ON DELETE RESTRICT,
            "created_at" TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            "updated_at" TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
];

const INDEXES: &[&str] = &[
    r#"CREATE INDEX IF NOT EXISTS "idx_products_brand_id" ON "products" ("brand_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_people_city_id" ON "people" ("city_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_dependents_person_id" ON "dependents" ("person_id")"#,
    r#"CREATE INDEX IF NOT EXISTS "idx_cities_state" ON "cities" ("state")"#,
];

/// Create every table and index that does not exist yet. Idempotent.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for (name, ddl) in TABLES {
        tracing::debug!(table = %name, "ensure table");
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    for ddl in INDEXES {
        sqlx::query(ddl).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(tables = TABLES.len(), "schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BRANDS, CITIES, DEPENDENTS, PEOPLE, PRODUCTS};

    #[test]
    fn ddl_declares_every_descriptor_column() {
        for table in [&BRANDS, &PRODUCTS, &CITIES, &PEOPLE, &DEPENDENTS] {
            let (_, ddl) = TABLES
                .iter()
                .find(|(name, _)| *name == table.name)
                .expect("table has ddl");
            for column in table.columns {
                assert!(
                    ddl.contains(&format!("\"{}\"", column)),
                    "{}.{} missing from ddl",
                    table.name,
                    column
                );
            }
        }
    }

    #[test]
    fn parents_are_created_before_children() {
        let position = |name: &str| TABLES.iter().position(|(n, _)| *n == name).unwrap();
        assert!(position("brands") < position("products"));
        assert!(position("cities") < position("people"));
        assert!(position("people") < position("dependents"));
    }
}
