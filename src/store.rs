//! Database bootstrap: create the target database when missing and open the pool.

use crate::config::Config;
use crate::error::AppError;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

/// Connect to the `postgres` maintenance database on the same server and create the target
/// database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin, db_name) = admin_options(database_url)?;
    let Some(db_name) = db_name.filter(|n| n != "postgres") else {
        return Ok(());
    };
    let mut conn: sqlx::PgConnection = admin.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

pub async fn connect(config: &Config) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    Ok(pool)
}

/// Options for the maintenance session (same server, user and TLS settings, database `postgres`)
/// and the target database name, if the URL names one.
fn admin_options(url: &str) -> Result<(PgConnectOptions, Option<String>), AppError> {
    let opts = PgConnectOptions::from_str(url)?;
    let db_name = opts
        .get_database()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string);
    Ok((opts.database("postgres"), db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_session_targets_postgres_database() {
        let (admin, name) =
            admin_options("postgres://u:p@localhost:5432/produtos?sslmode=disable").unwrap();
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(admin.get_host(), "localhost");
        assert_eq!(admin.get_port(), 5432);
        assert_eq!(name.as_deref(), Some("produtos"));
    }

    #[test]
    fn socket_host_in_query_string_keeps_database_name() {
        let (admin, name) =
            admin_options("postgres://u:p@localhost/produtos?host=/var/run/postgresql").unwrap();
        assert_eq!(name.as_deref(), Some("produtos"));
        assert_eq!(admin.get_database(), Some("postgres"));
        assert_eq!(
            admin.get_socket().map(|p| p.as_path()),
            Some(std::path::Path::new("/var/run/postgresql"))
        );
    }

    #[test]
    fn url_without_path_names_no_database() {
        let (admin, name) = admin_options("postgres://u:p@localhost:5432").unwrap();
        assert!(name.is_none());
        assert_eq!(admin.get_host(), "localhost");
    }

    #[test]
    fn quote_ident_doubles_quotes() {
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
    }
}
