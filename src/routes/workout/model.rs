use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routes::entries::{TrackedEntry, ensure, non_negative};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: Option<u32>,
    pub reps: Option<u32>,
    pub weight_kg: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub name: String,
    pub duration_minutes: u32,
    pub calories_burned: Option<f64>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default = "Utc::now")]
    pub performed_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl TrackedEntry for Workout {
    const COLLECTION: &'static str = "workouts";
    const LABEL: &'static str = "Workout";

    fn validate(&self) -> Result<(), String> {
        ensure(!self.name.trim().is_empty(), "name is required")?;
        ensure(self.duration_minutes > 0, "duration_minutes must be positive")?;
        non_negative(self.calories_burned, "calories_burned must not be negative")?;

        for exercise in &self.exercises {
            ensure(!exercise.name.trim().is_empty(), "exercise name is required")?;
            non_negative(exercise.weight_kg, "exercise weight_kg must not be negative")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn exercises_are_optional() {
        let workout: Workout = serde_json::from_value(json!({
            "name": "Morning run",
            "duration_minutes": 30,
        }))
        .unwrap();
        assert!(workout.exercises.is_empty());
        assert!(workout.validate().is_ok());
    }

    #[test]
    fn zero_duration_and_unnamed_exercises_are_rejected() {
        let mut workout: Workout = serde_json::from_value(json!({
            "name": "Legs",
            "duration_minutes": 0,
            "exercises": [{"name": "Squat", "sets": 5, "reps": 5, "weight_kg": 100.0}],
        }))
        .unwrap();
        assert_eq!(
            workout.validate().unwrap_err(),
            "duration_minutes must be positive"
        );

        workout.duration_minutes = 45;
        workout.exercises.push(Exercise {
            name: String::new(),
            sets: None,
            reps: None,
            weight_kg: None,
        });
        assert_eq!(workout.validate().unwrap_err(), "exercise name is required");
    }
}
