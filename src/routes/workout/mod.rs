mod model;

use axum::Router;

use crate::AppState;
use crate::routes::entries;

pub use model::{Exercise, Workout};

pub fn router(state: &AppState) -> Router<AppState> {
    entries::router::<Workout>(state)
}
