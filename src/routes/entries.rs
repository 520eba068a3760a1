use axum::{
    Router,
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::get,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{
    AppState,
    common::{JsonOrForm, parse_id},
    database::{Document, User},
    error::AppError,
    middleware::auth_middleware,
    result::ApiResult,
    utils::{message_to_api_response, success_to_api_response},
};

/// A user-owned record kept in its own document collection.
pub trait TrackedEntry: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    /// Human label used in messages, e.g. "Workout".
    const LABEL: &'static str;

    fn validate(&self) -> Result<(), String>;
}

/// A stored entry as returned to clients.
#[derive(Debug, Serialize, Deserialize)]
pub struct Entry<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T: DeserializeOwned> TryFrom<Document> for Entry<T> {
    type Error = AppError;

    fn try_from(doc: Document) -> Result<Self, Self::Error> {
        let data = serde_json::from_value(doc.body).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "stored {} document {} is unreadable: {}",
                doc.collection,
                doc.id,
                e
            ))
        })?;

        Ok(Entry {
            id: doc.id,
            data,
            created_at: doc.created_at,
            updated_at: doc.updated_at,
        })
    }
}

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub(crate) fn ensure(condition: bool, message: &str) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

pub(crate) fn non_negative(value: Option<f64>, message: &str) -> Result<(), String> {
    ensure(value.is_none_or(|v| v.is_finite() && v >= 0.0), message)
}

/// CRUD over the caller's entries; every route sits behind the auth gate.
pub fn router<T: TrackedEntry>(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list::<T>).post(create::<T>))
        .route("/{id}", get(fetch::<T>).put(update::<T>).delete(remove::<T>))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware))
}

pub async fn load<T: TrackedEntry>(state: &AppState, user_id: Uuid) -> Result<Vec<Entry<T>>, AppError> {
    state
        .documents
        .list(T::COLLECTION, user_id)
        .await?
        .into_iter()
        .map(Entry::try_from)
        .collect()
}

fn encode<T: TrackedEntry>(data: &T) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(data).map_err(|e| AppError::Internal(e.into()))
}

fn not_found<T: TrackedEntry>() -> AppError {
    AppError::NotFound(format!("{} not found", T::LABEL))
}

async fn list<T: TrackedEntry>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResult<Vec<Entry<T>>>>, AppError> {
    let entries = load::<T>(&state, user.id).await?;
    Ok(success_to_api_response(entries))
}

async fn create<T: TrackedEntry>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    JsonOrForm(data): JsonOrForm<T>,
) -> Result<(StatusCode, Json<ApiResult<Entry<T>>>), AppError> {
    data.validate().map_err(AppError::BadRequest)?;

    let doc = state
        .documents
        .insert(T::COLLECTION, user.id, encode(&data)?)
        .await?;
    tracing::debug!("Created {} {} for user {}", T::COLLECTION, doc.id, user.id);

    Ok((StatusCode::CREATED, success_to_api_response(Entry::try_from(doc)?)))
}

async fn fetch<T: TrackedEntry>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ApiResult<Entry<T>>>, AppError> {
    let id = parse_id(&id)?;
    let doc = state
        .documents
        .get(T::COLLECTION, user.id, id)
        .await?
        .ok_or_else(not_found::<T>)?;

    Ok(success_to_api_response(Entry::try_from(doc)?))
}

async fn update<T: TrackedEntry>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    JsonOrForm(data): JsonOrForm<T>,
) -> Result<Json<ApiResult<Entry<T>>>, AppError> {
    let id = parse_id(&id)?;
    data.validate().map_err(AppError::BadRequest)?;

    let doc = state
        .documents
        .replace(T::COLLECTION, user.id, id, encode(&data)?)
        .await?
        .ok_or_else(not_found::<T>)?;

    Ok(success_to_api_response(Entry::try_from(doc)?))
}

async fn remove<T: TrackedEntry>(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ApiResult<()>>, AppError> {
    let id = parse_id(&id)?;
    if !state.documents.delete(T::COLLECTION, user.id, id).await? {
        return Err(not_found::<T>());
    }

    Ok(message_to_api_response(format!("{} deleted", T::LABEL)))
}
