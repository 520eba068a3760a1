use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::database::StoreError;
use crate::result::ApiResult;

/// Reasons the authentication gate refuses a request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Not authorized to access this route")]
    MissingToken,
    #[error("Token is invalid or expired")]
    InvalidToken,
    #[error("User not found")]
    UserNotFound,
    #[error("User account is deactivated")]
    Deactivated,
    /// The user store failed; logged with its cause, answered like a bad token.
    #[error("Token is invalid or expired")]
    Lookup(#[source] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    /// A request the framework could not accept (malformed body, too large...).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
    #[error("Not allowed by CORS")]
    CorsRejected,
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

/// What went wrong, attached to error responses so the central renderer can
/// log it and expose the detail outside production.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub message: String,
    pub detail: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth(_) | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) | AppError::CorsRejected => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Rejected { status, .. } => *status,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            // anyhow's Debug prints the cause chain and, when captured, the backtrace
            AppError::Internal(err) => format!("{err:?}"),
            AppError::Auth(AuthError::Lookup(err)) => format!("{err:?}"),
            other => format!("{other:?}"),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(message) => AppError::Conflict(message),
            other => AppError::Internal(other.into()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let report = ErrorReport {
            message: message.clone(),
            detail: self.detail(),
        };

        let mut response = (status, Json(ApiResult::error(message, None))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}
