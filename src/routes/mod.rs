pub mod admin;
pub mod analytics;
pub mod auth;
pub mod entries;
pub mod health;
pub mod meals;
pub mod plan;
pub mod steps;
pub mod weight;
pub mod workout;

use crate::error::AppError;

pub async fn not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}
