use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::routes::entries::{TrackedEntry, ensure, non_negative, today};

const MAX_DAILY_STEPS: u32 = 500_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepsEntry {
    pub count: u32,
    #[serde(default = "today")]
    pub date: NaiveDate,
    pub distance_km: Option<f64>,
}

impl TrackedEntry for StepsEntry {
    const COLLECTION: &'static str = "steps";
    const LABEL: &'static str = "Steps entry";

    fn validate(&self) -> Result<(), String> {
        ensure(
            self.count <= MAX_DAILY_STEPS,
            "count exceeds the daily maximum",
        )?;
        non_negative(self.distance_km, "distance_km must not be negative")
    }
}
