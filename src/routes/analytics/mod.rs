mod handler;
mod model;

use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::{AppState, middleware::auth_middleware};

pub use model::{Summary, summarize};

pub fn router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/summary", get(handler::summary))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}
