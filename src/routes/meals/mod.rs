mod model;

use axum::Router;

use crate::AppState;
use crate::routes::entries;

pub use model::{Meal, MealType};

pub fn router(state: &AppState) -> Router<AppState> {
    entries::router::<Meal>(state)
}
