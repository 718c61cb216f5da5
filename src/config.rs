//! Application settings read from the environment (optionally seeded from `.env`).

use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Minimum HS256 secret length accepted at startup.
pub const MIN_SECRET_LEN: usize = 32;

/// Upper bound for `JWT_TTL_MINUTES` (one year).
pub const MAX_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ConfigError::Invalid {
                key: "APP_ENV",
                reason: format!("unknown environment '{}'", other),
            }),
        }
    }
}

/// Token validation parameters: issuer, audience and the symmetric signing secret.
#[derive(Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub secret: String,
    pub ttl_minutes: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("secret", &"<redacted>")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

/// Username/password accepted by the login endpoint.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub environment: Environment,
    pub jwt: JwtConfig,
    /// When unset, login always fails.
    pub credentials: Option<Credentials>,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// - `DATABASE_URL` (required)
    /// - `DB_MAX_CONNECTIONS` (default 5)
    /// - `BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `APP_ENV` (default `production`)
    /// - `JWT_VALID_ISSUER`, `JWT_VALID_AUDIENCE`, `JWT_SECRET` (required)
    /// - `JWT_TTL_MINUTES` (default 60)
    /// - `AUTH_USERNAME`, `AUTH_PASSWORD` (optional, both or neither)
    /// - `REQUEST_TIMEOUT_SECS` (default 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading from an arbitrary source.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let secret = required("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
            });
        }

        let credentials = match (get("AUTH_USERNAME"), get("AUTH_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials { username, password }),
            (None, None) => None,
            _ => {
                return Err(ConfigError::Invalid {
                    key: "AUTH_USERNAME",
                    reason: "AUTH_USERNAME and AUTH_PASSWORD must be set together".into(),
                })
            }
        };

        let ttl_minutes = parse_or(get("JWT_TTL_MINUTES"), "JWT_TTL_MINUTES", 60)?;
        if !(1..=MAX_TTL_MINUTES).contains(&ttl_minutes) {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_MINUTES",
                reason: format!("must be between 1 and {}", MAX_TTL_MINUTES),
            });
        }

        let environment = match get("APP_ENV") {
            Some(v) => v.parse()?,
            None => Environment::Production,
        };

        Ok(Config {
            database_url: required("DATABASE_URL")?,
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".into()),
            environment,
            jwt: JwtConfig {
                issuer: required("JWT_VALID_ISSUER")?,
                audience: required("JWT_VALID_AUDIENCE")?,
                secret,
                ttl_minutes,
            },
            credentials,
            request_timeout: Duration::from_secs(parse_or(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                30,
            )?),
        })
    }

    /// The OpenAPI document is only served in development.
    pub fn docs_enabled(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
    }
}
