mod model;

use axum::Router;

use crate::AppState;
use crate::routes::entries;

pub use model::{Goal, Plan};

pub fn router(state: &AppState) -> Router<AppState> {
    entries::router::<Plan>(state)
}
