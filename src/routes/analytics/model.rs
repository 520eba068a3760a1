use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::routes::entries::Entry;
use crate::routes::{meals::Meal, steps::StepsEntry, weight::WeightEntry, workout::Workout};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;
pub const MAX_WINDOW_DAYS: u32 = 365;

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub days: Option<u32>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WeightSummary {
    pub entries: usize,
    pub starting_kg: Option<f64>,
    pub latest_kg: Option<f64>,
    pub change_kg: Option<f64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WorkoutSummary {
    pub count: usize,
    pub total_minutes: u64,
    pub calories_burned: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct BestDay {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct StepsSummary {
    pub total: u64,
    pub daily_average: f64,
    pub best_day: Option<BestDay>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct NutritionSummary {
    pub meals: usize,
    pub calories_consumed: f64,
    pub daily_average_calories: f64,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Summary {
    pub period_days: u32,
    pub since: DateTime<Utc>,
    pub weight: WeightSummary,
    pub workouts: WorkoutSummary,
    pub steps: StepsSummary,
    pub nutrition: NutritionSummary,
}

/// Everything the summary is computed from, already loaded for one user.
pub struct Activity {
    pub weights: Vec<Entry<WeightEntry>>,
    pub workouts: Vec<Entry<Workout>>,
    pub steps: Vec<Entry<StepsEntry>>,
    pub meals: Vec<Entry<Meal>>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn average(total: f64, days: usize) -> f64 {
    if days == 0 { 0.0 } else { round2(total / days as f64) }
}

/// Aggregates entries dated at or after `since`.
pub fn summarize(activity: &Activity, period_days: u32, since: DateTime<Utc>) -> Summary {
    let since_date = since.date_naive();

    let mut weights: Vec<&WeightEntry> = activity
        .weights
        .iter()
        .map(|e| &e.data)
        .filter(|w| w.recorded_at >= since)
        .collect();
    weights.sort_by_key(|w| w.recorded_at);
    let starting_kg = weights.first().map(|w| w.weight_kg);
    let latest_kg = weights.last().map(|w| w.weight_kg);
    let weight = WeightSummary {
        entries: weights.len(),
        starting_kg,
        latest_kg,
        change_kg: starting_kg.zip(latest_kg).map(|(s, l)| round2(l - s)),
    };

    let workouts: Vec<&Workout> = activity
        .workouts
        .iter()
        .map(|e| &e.data)
        .filter(|w| w.performed_at >= since)
        .collect();
    let workouts = WorkoutSummary {
        count: workouts.len(),
        total_minutes: workouts.iter().map(|w| u64::from(w.duration_minutes)).sum(),
        calories_burned: round2(workouts.iter().filter_map(|w| w.calories_burned).sum()),
    };

    // several entries on the same day add up
    let mut steps_by_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for entry in activity.steps.iter().filter(|e| e.data.date >= since_date) {
        *steps_by_day.entry(entry.data.date).or_default() += u64::from(entry.data.count);
    }
    let steps_total: u64 = steps_by_day.values().sum();
    let best_day = steps_by_day
        .iter()
        .max_by_key(|(date, count)| (**count, std::cmp::Reverse(**date)))
        .map(|(date, count)| BestDay {
            date: *date,
            count: *count,
        });
    let steps = StepsSummary {
        total: steps_total,
        daily_average: average(steps_total as f64, steps_by_day.len()),
        best_day,
    };

    let meals: Vec<&Meal> = activity
        .meals
        .iter()
        .map(|e| &e.data)
        .filter(|m| m.eaten_at >= since)
        .collect();
    let meal_days: BTreeSet<NaiveDate> = meals.iter().map(|m| m.eaten_at.date_naive()).collect();
    let calories_consumed: f64 = meals.iter().map(|m| m.calories).sum();
    let nutrition = NutritionSummary {
        meals: meals.len(),
        calories_consumed: round2(calories_consumed),
        daily_average_calories: average(calories_consumed, meal_days.len()),
    };

    Summary {
        period_days,
        since,
        weight,
        workouts,
        steps,
        nutrition,
    }
}
