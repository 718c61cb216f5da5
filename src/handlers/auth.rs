//! Login and caller introspection.

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::response::success_one_ok;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    pub password: String,
}

/// Byte comparison whose running time depends only on the lengths.
fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Exchange the configured credentials for a bearer token.
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = body?;
    let accepted = state.config.credentials.as_ref().is_some_and(|c| {
        let user_ok = constant_time_eq(&c.username, &body.username);
        let password_ok = constant_time_eq(&c.password, &body.password);
        user_ok & password_ok
    });
    if !accepted {
        tracing::warn!(username = %body.username, "login rejected");
        return Err(AppError::Unauthorized("invalid username or password".into()));
    }
    let issued = state.tokens.issue(&body.username)?;
    tracing::info!(username = %body.username, expires_at = %issued.expires_at, "token issued");
    Ok(success_one_ok(issued))
}

/// Claims of the token used for this request.
pub async fn me(AuthUser(claims): AuthUser) -> impl IntoResponse {
    success_one_ok(claims)
}
