use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::routes::entries::{TrackedEntry, ensure, today};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    LoseWeight,
    Maintain,
    GainMuscle,
    ImproveEndurance,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    pub title: String,
    pub goal: Goal,
    pub target_weight_kg: Option<f64>,
    pub daily_calorie_target: Option<u32>,
    pub daily_step_target: Option<u32>,
    pub weekly_workout_target: Option<u32>,
    #[serde(default = "today")]
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl TrackedEntry for Plan {
    const COLLECTION: &'static str = "plans";
    const LABEL: &'static str = "Plan";

    fn validate(&self) -> Result<(), String> {
        ensure(!self.title.trim().is_empty(), "title is required")?;
        ensure(
            self.target_weight_kg
                .is_none_or(|w| w.is_finite() && w > 0.0 && w < 1000.0),
            "target_weight_kg must be between 0 and 1000",
        )?;
        ensure(
            self.weekly_workout_target.is_none_or(|n| n <= 21),
            "weekly_workout_target must be at most 21",
        )?;
        ensure(
            self.end_date.is_none_or(|end| end >= self.start_date),
            "end_date must not be before start_date",
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn goal_uses_snake_case() {
        let plan: Plan = serde_json::from_value(json!({
            "title": "Cut",
            "goal": "lose_weight",
            "target_weight_kg": 75.0,
        }))
        .unwrap();
        assert_eq!(plan.goal, Goal::LoseWeight);
        assert_eq!(plan.start_date, today());
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn end_date_before_start_is_rejected() {
        let plan: Plan = serde_json::from_value(json!({
            "title": "Bulk",
            "goal": "gain_muscle",
            "start_date": "2025-03-01",
            "end_date": "2025-02-01",
        }))
        .unwrap();
        assert_eq!(
            plan.validate().unwrap_err(),
            "end_date must not be before start_date"
        );
    }
}
