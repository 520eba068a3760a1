use axum::extract::{Extension, Json, Path, State};

use crate::{
    AppState,
    common::{JsonOrForm, parse_id},
    database::User,
    error::AppError,
    result::ApiResult,
    utils::success_to_api_response,
};

use super::model::UpdateStatusRequest;

pub async fn list_users(State(state): State<AppState>) -> Result<Json<ApiResult<Vec<User>>>, AppError> {
    let users = state.users.list_users().await?;
    Ok(success_to_api_response(users))
}

pub async fn set_status(
    State(state): State<AppState>,
    Extension(admin): Extension<User>,
    Path(id): Path<String>,
    JsonOrForm(req): JsonOrForm<UpdateStatusRequest>,
) -> Result<Json<ApiResult<User>>, AppError> {
    let id = parse_id(&id)?;
    if id == admin.id && !req.is_active {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    let user = state
        .users
        .set_active(id, req.is_active)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    tracing::info!(
        "Admin {} set user {} active={}",
        admin.id,
        user.id,
        user.is_active
    );

    let message = if user.is_active {
        "User activated"
    } else {
        "User deactivated"
    };
    Ok(Json(ApiResult::success(user).with_message(message)))
}
