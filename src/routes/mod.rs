//! Router assembly: public routes, bearer-protected API, optional OpenAPI document.

mod common;
mod docs;
mod entity;

pub use common::common_routes;
pub use docs::{docs_routes, OPENAPI_PATH};
pub use entity::entity_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Maximum accepted request body.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Full application router with tracing, timeout and body limit layers.
pub fn app(state: AppState) -> Router {
    let timeout = state.config.request_timeout;
    let docs = state.config.docs_enabled();

    let mut router = Router::new()
        .merge(common_routes(state.clone()))
        .merge(entity_routes(state));
    if docs {
        router = router.merge(docs_routes());
    }

    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
            .layer(TimeoutLayer::new(timeout)),
    )
}
