use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routes::entries::{TrackedEntry, ensure, non_negative};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub meal_type: MealType,
    pub calories: f64,
    pub protein_g: Option<f64>,
    pub carbs_g: Option<f64>,
    pub fat_g: Option<f64>,
    #[serde(default = "Utc::now")]
    pub eaten_at: DateTime<Utc>,
}

impl TrackedEntry for Meal {
    const COLLECTION: &'static str = "meals";
    const LABEL: &'static str = "Meal";

    fn validate(&self) -> Result<(), String> {
        ensure(!self.name.trim().is_empty(), "name is required")?;
        non_negative(Some(self.calories), "calories must not be negative")?;
        non_negative(self.protein_g, "protein_g must not be negative")?;
        non_negative(self.carbs_g, "carbs_g must not be negative")?;
        non_negative(self.fat_g, "fat_g must not be negative")
    }
}
