use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    AppState,
    common::JsonOrForm,
    config::Config,
    database::{NewUser, Role, User},
    error::{AppError, AuthError},
    middleware::TOKEN_COOKIE,
    result::ApiResult,
    utils::{
        generate_token, hash_password, message_to_api_response, success_to_api_response,
        verify_password,
    },
};

use super::model::{AuthResponse, LoginRequest, RegisterRequest};

fn session_cookie(token: String, config: &Config) -> Cookie<'static> {
    let cookie = Cookie::build((TOKEN_COOKIE, token))
        .http_only(true)
        .path("/")
        .max_age(time::Duration::seconds(config.jwt_expiration_secs as i64));

    // the production frontend is on another site, so the cookie must be cross-site
    if config.is_development() {
        cookie.same_site(SameSite::Lax).build()
    } else {
        cookie.same_site(SameSite::None).secure(true).build()
    }
}

fn issue_session(
    user: User,
    state: &AppState,
    jar: CookieJar,
) -> Result<(CookieJar, AuthResponse), AppError> {
    let (token, expires_at) =
        generate_token(user.id, &state.config).map_err(|e| AppError::Internal(e.into()))?;

    let jar = jar.add(session_cookie(token.clone(), &state.config));
    Ok((
        jar,
        AuthResponse {
            user,
            token,
            expires_at,
        },
    ))
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonOrForm(req): JsonOrForm<RegisterRequest>,
) -> Result<(StatusCode, CookieJar, Json<ApiResult<AuthResponse>>), AppError> {
    req.validate().map_err(AppError::BadRequest)?;

    let password_hash = hash_password(&req.password).map_err(|e| AppError::Internal(e.into()))?;
    let email = req.email.trim().to_lowercase();
    let role = if state.config.is_admin_email(&email) {
        Role::Admin
    } else {
        Role::User
    };
    let user = state
        .users
        .create(NewUser {
            name: req.name.trim().to_string(),
            email,
            password_hash,
            role,
        })
        .await?;
    tracing::info!("Registered user {} as {}", user.id, user.role);

    let (jar, body) = issue_session(user, &state, jar)?;
    Ok((StatusCode::CREATED, jar, success_to_api_response(body)))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonOrForm(req): JsonOrForm<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResult<AuthResponse>>), AppError> {
    let user = state
        .users
        .find_by_email(req.email.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    let password_ok =
        verify_password(&req.password, &user.password_hash).map_err(|e| AppError::Internal(e.into()))?;
    if !password_ok {
        tracing::debug!("Failed login for user {}", user.id);
        return Err(invalid_credentials());
    }

    if !user.is_active {
        return Err(AuthError::Deactivated.into());
    }

    let (jar, body) = issue_session(user, &state, jar)?;
    Ok((jar, success_to_api_response(body)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResult<()>>) {
    let jar = jar.remove(Cookie::build((TOKEN_COOKIE, "")).path("/"));
    (jar, message_to_api_response("Logged out"))
}

/// The auth middleware has already resolved the user.
pub async fn me(Extension(user): Extension<User>) -> Json<ApiResult<User>> {
    success_to_api_response(user)
}
