use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::Next,
    response::Response,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use crate::{AppState, config::Config, error::AppError};

/// Decorates responses for allow-listed origins. Credentials are allowed, so
/// origins are echoed explicitly rather than wildcarded.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::HEAD,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers(AllowHeaders::mirror_request())
}

/// Requests without an `Origin` header (curl, mobile clients) pass; any other
/// origin must be on the allow-list.
pub async fn reject_disallowed_origin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(origin) = req.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .map(|o| state.config.is_origin_allowed(o))
            .unwrap_or(false);

        if !allowed {
            tracing::warn!("Rejected cross-origin request from {:?}", origin);
            return Err(AppError::CorsRejected);
        }
    }

    Ok(next.run(req).await)
}
