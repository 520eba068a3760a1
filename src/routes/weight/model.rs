use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::routes::entries::{TrackedEntry, ensure};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntry {
    pub weight_kg: f64,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl TrackedEntry for WeightEntry {
    const COLLECTION: &'static str = "weight";
    const LABEL: &'static str = "Weight entry";

    fn validate(&self) -> Result<(), String> {
        ensure(
            self.weight_kg.is_finite() && self.weight_kg > 0.0 && self.weight_kg < 1000.0,
            "weight_kg must be between 0 and 1000",
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn recorded_at_defaults_to_now() {
        let before = Utc::now();
        let entry: WeightEntry = serde_json::from_value(json!({"weight_kg": 72.4})).unwrap();
        assert!(entry.recorded_at >= before);
        assert!(entry.note.is_none());
        assert!(entry.validate().is_ok());
    }

    #[test]
    fn implausible_weights_are_rejected() {
        for weight_kg in [0.0, -3.0, 1200.0, f64::NAN] {
            let entry = WeightEntry {
                weight_kg,
                recorded_at: Utc::now(),
                note: None,
            };
            assert!(entry.validate().is_err(), "{weight_kg} accepted");
        }
    }
}
