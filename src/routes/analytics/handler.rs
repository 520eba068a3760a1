use axum::extract::{Extension, Json, Query, State};
use chrono::{Duration, Utc};

use crate::{
    AppState,
    database::User,
    error::AppError,
    result::ApiResult,
    routes::{
        entries::load, meals::Meal, steps::StepsEntry, weight::WeightEntry, workout::Workout,
    },
    utils::success_to_api_response,
};

use super::model::{Activity, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS, Summary, SummaryQuery, summarize};

pub async fn summary(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<ApiResult<Summary>>, AppError> {
    let days = query.days.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(1..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(AppError::BadRequest(format!(
            "days must be between 1 and {MAX_WINDOW_DAYS}"
        )));
    }

    let (weights, workouts, steps, meals) = tokio::try_join!(
        load::<WeightEntry>(&state, user.id),
        load::<Workout>(&state, user.id),
        load::<StepsEntry>(&state, user.id),
        load::<Meal>(&state, user.id),
    )?;
    let activity = Activity {
        weights,
        workouts,
        steps,
        meals,
    };

    let since = Utc::now() - Duration::days(i64::from(days));
    Ok(success_to_api_response(summarize(&activity, days, since)))
}
