use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use uuid::Uuid;

use crate::{
    AppState,
    database::User,
    error::{AppError, AuthError},
    utils::verify_token,
};

pub const TOKEN_COOKIE: &str = "token";

/// Finds the session token: the `token` cookie wins, the bearer header is
/// only consulted when no cookie token is present.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = CookieJar::from_headers(headers)
        .get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty());

    from_cookie.or_else(|| {
        headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string())
            .filter(|v| !v.is_empty())
    })
}

/// Resolves the request's token to an active user.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, AuthError> {
    let token = extract_token(headers).ok_or(AuthError::MissingToken)?;

    let claims = verify_token(&token, &state.config).map_err(|e| {
        tracing::debug!("Token verification failed: {}", e);
        AuthError::InvalidToken
    })?;

    // a subject that can't be a user id is as bad as a forged token
    let user_id = Uuid::parse_str(&claims.id).map_err(|_| AuthError::InvalidToken)?;

    let user = state
        .users
        .find_by_id(user_id)
        .await
        .map_err(|e| {
            tracing::error!("User lookup failed during authentication: {:?}", e);
            AuthError::Lookup(e)
        })?
        .ok_or(AuthError::UserNotFound)?;

    if !user.is_active {
        tracing::warn!("Deactivated user {} attempted access", user.id);
        return Err(AuthError::Deactivated);
    }

    Ok(user)
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(&state, req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Must run after `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    match req.extensions().get::<User>() {
        Some(user) if user.is_admin() => Ok(next.run(req).await),
        Some(_) => Err(AppError::Forbidden("Not authorized as an admin".to_string())),
        None => Err(AuthError::MissingToken.into()),
    }
}
