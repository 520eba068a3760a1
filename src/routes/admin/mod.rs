mod handler;
mod model;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch},
};

use crate::{
    AppState,
    middleware::{auth_middleware, require_admin},
};

pub fn router(state: &AppState) -> Router<AppState> {
    // route layers wrap outside-in: the gate runs before the admin check
    Router::new()
        .route("/users", get(handler::list_users))
        .route("/users/{id}/status", patch(handler::set_status))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}
