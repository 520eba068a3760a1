use std::any::Any;

use axum::{
    Json,
    body::{Body, to_bytes},
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::{
    AppState,
    error::{AppError, ErrorReport},
    result::ApiResult,
};

const ERROR_BODY_LIMIT: usize = 64 * 1024;

/// Central error handler: every 4xx/5xx leaving the router is logged and
/// re-rendered as `{success: false, message, stack?}`. `stack` is only
/// included in development.
pub async fn render_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;

    let status = response.status();
    if !status.is_client_error() && !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let (message, detail) = match parts.extensions.remove::<ErrorReport>() {
        Some(report) => (report.message, Some(report.detail)),
        None => {
            // framework rejections carry plain text bodies
            let bytes = match to_bytes(body, ERROR_BODY_LIMIT).await {
                Ok(b) => b,
                Err(e) => {
                    error!("Failed to read error response body: {}", e);
                    Default::default()
                }
            };
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            let message = if text.is_empty() {
                status.canonical_reason().unwrap_or("Error").to_string()
            } else {
                text
            };
            (message, None)
        }
    };

    if status.is_server_error() {
        error!(
            "Server error occurred - {} {} - Status: {}, Message: {}, Detail: {}",
            method,
            uri,
            status,
            message,
            detail.as_deref().unwrap_or("-")
        );
    } else {
        debug!("{} {} - Status: {}, Message: {}", method, uri, status, message);
    }

    let stack = if state.config.is_development() {
        detail
    } else {
        None
    };

    let rendered = Json(ApiResult::error(message, stack)).into_response();
    parts.headers.remove(header::CONTENT_LENGTH);
    if let Some(content_type) = rendered.headers().get(header::CONTENT_TYPE) {
        parts.headers.insert(header::CONTENT_TYPE, content_type.clone());
    }
    Response::from_parts(parts, rendered.into_body())
}

/// Turns a handler panic into a 500 that flows through `render_errors`.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let reason = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(anyhow::anyhow!("handler panicked: {reason}")).into_response()
}
