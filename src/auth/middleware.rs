//! Bearer token gate for protected routes.

use crate::error::AppError;
use crate::state::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(request: &Request) -> Option<&str> {
    let value = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Requires a valid JWT and stores its `Claims` in request extensions for handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(&request) else {
        tracing::warn!(path = %request.uri().path(), "missing bearer token");
        return Err(AppError::Unauthorized("missing authorization token".into()));
    };

    let claims = state.tokens.verify(token).map_err(|e| {
        tracing::warn!(path = %request.uri().path(), error = %e, "rejected bearer token");
        e
    })?;

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
