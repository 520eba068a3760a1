use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
};
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::{
    AppState,
    middleware::{cors_layer, handle_panic, reject_disallowed_origin, render_errors},
    routes,
};

// Resource route groups, each mounted under its own prefix
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/api/auth", routes::auth::router(state))
        .nest("/api/admin", routes::admin::router(state))
        .nest("/api/plan", routes::plan::router(state))
        .nest("/api/weight", routes::weight::router(state))
        .nest("/api/workout", routes::workout::router(state))
        .nest("/api/steps", routes::steps::router(state))
        .nest("/api/meals", routes::meals::router(state))
        .nest("/api/analytics", routes::analytics::router(state))
        .route("/api/health", get(routes::health::health))
}

/// Wraps `router` in the shared middleware chain. Layers added later run
/// first, so a request passes tracing, error rendering, the origin guard,
/// CORS, the panic catcher and the body limit before reaching a route.
/// Unknown paths and unsupported methods both end in the JSON 404.
pub fn with_layers(router: Router<AppState>, state: AppState) -> Router {
    router
        .fallback(routes::not_found)
        .method_not_allowed_fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(state.config.body_limit_bytes))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&state.config))
        .layer(from_fn_with_state(state.clone(), reject_disallowed_origin))
        .layer(from_fn_with_state(state.clone(), render_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn create_router(state: AppState) -> Router {
    with_layers(api_routes(&state), state)
}

/// The served application. Trailing slashes are trimmed before routing, so
/// `/api/plan/` reaches the same handler as `/api/plan`.
pub fn create_app(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(create_router(state))
}
