mod handler;
mod model;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};

use crate::{AppState, middleware::auth_middleware};

pub use model::{AuthResponse, LoginRequest, RegisterRequest};

pub fn router(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(handler::me))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .route("/logout", post(handler::logout))
        .merge(protected)
}
