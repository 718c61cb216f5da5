//! Entity CRUD routes under /api, gated by the bearer token middleware.

use crate::auth::auth_middleware;
use crate::handlers::auth::{login, me};
use crate::handlers::entity::{create, delete as delete_handler, list, read, update};
use crate::handlers::Resource;
use crate::model::{Brand, City, Dependent, Person, Product};
use crate::state::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

/// `GET|POST {base}` and `GET|PUT|DELETE {base}/:id` for one entity.
fn resource_routes<E: Resource>(router: Router<AppState>, base: &str) -> Router<AppState> {
    router.route(base, get(list::<E>).post(create::<E>)).route(
        &format!("{}/:id", base),
        get(read::<E>).put(update::<E>).delete(delete_handler::<E>),
    )
}

pub fn entity_routes(state: AppState) -> Router {
    let mut protected = Router::new();
    protected = resource_routes::<Product>(protected, "/api/products");
    protected = resource_routes::<Brand>(protected, "/api/brands");
    protected = resource_routes::<Person>(protected, "/api/people");
    protected = resource_routes::<Dependent>(protected, "/api/dependents");
    protected = resource_routes::<City>(protected, "/api/cities");
    let protected = protected
        .route("/api/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/api/auth/login", post(login))
        .merge(protected)
        .with_state(state)
}
