//! OpenAPI document route.

use crate::openapi::openapi;
use axum::{routing::get, Json, Router};
use std::sync::Arc;

pub const OPENAPI_PATH: &str = "/swagger/v1/swagger.json";

pub fn docs_routes() -> Router {
    let doc = Arc::new(openapi());
    Router::new().route(
        OPENAPI_PATH,
        get(move || {
            let doc = Arc::clone(&doc);
            async move { Json(doc.as_ref().clone()) }
        }),
    )
}
