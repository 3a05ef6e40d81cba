//! Unit systems and display formatting for the workout list.
//!
//! The active unit system comes from an injected [`UnitPreferences`] capability; nothing in
//! here reads global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sort::SortKey;
use crate::{RetrievedCollection, WorkoutRecord};

const METERS_TO_KM: f64 = 0.001;
const METERS_TO_MILES: f64 = 0.00062137119;
const KM_TO_MILES: f64 = 0.62137119;
const MILES_TO_KM: f64 = 1.609344;

/// Shown when a workout has no recorded distance.
pub const DISTANCE_NOT_RECORDED: &str = "Not recorded";

/// Metric or imperial display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum UnitSystem {
    Metric,
    #[default]
    Imperial,
}

impl UnitSystem {
    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    /// Short distance suffix: "km" or "mi".
    pub fn distance_suffix(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    /// Meters to kilometers or miles.
    pub fn convert_meters(&self, meters: f64) -> f64 {
        match self {
            UnitSystem::Metric => meters * METERS_TO_KM,
            UnitSystem::Imperial => meters * METERS_TO_MILES,
        }
    }

    /// Kilometers to the display unit.
    pub fn convert_kilometers(&self, kilometers: f64) -> f64 {
        match self {
            UnitSystem::Metric => kilometers,
            UnitSystem::Imperial => kilometers * KM_TO_MILES,
        }
    }

    /// Miles to the display unit.
    pub fn convert_miles(&self, miles: f64) -> f64 {
        match self {
            UnitSystem::Metric => miles * MILES_TO_KM,
            UnitSystem::Imperial => miles,
        }
    }

    /// Celsius to the display temperature unit.
    pub fn convert_celsius(&self, celsius: f64) -> f64 {
        match self {
            UnitSystem::Metric => celsius,
            UnitSystem::Imperial => celsius * 9.0 / 5.0 + 32.0,
        }
    }

    /// Fahrenheit to the display temperature unit.
    pub fn convert_fahrenheit(&self, fahrenheit: f64) -> f64 {
        match self {
            UnitSystem::Metric => (fahrenheit - 32.0) * 5.0 / 9.0,
            UnitSystem::Imperial => fahrenheit,
        }
    }
}

/// Source of the user's unit preference.
pub trait UnitPreferences: Send + Sync {
    fn unit_system(&self) -> UnitSystem;
}

/// A preference that never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedUnitPreference(pub UnitSystem);

impl UnitPreferences for FixedUnitPreference {
    fn unit_system(&self) -> UnitSystem {
        self.0
    }
}

/// "5.0 km", "3.1 mi" or "Not recorded".
pub fn format_distance(meters: Option<f64>, units: UnitSystem) -> String {
    match meters {
        Some(m) => format!("{:.1} {}", units.convert_meters(m), units.distance_suffix()),
        None => DISTANCE_NOT_RECORDED.to_string(),
    }
}

/// Whole hours and minutes, e.g. "1 hr 5 min", "45 min", "2 hr". Under a minute is "0 min".
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = if seconds.is_finite() && seconds > 0.0 {
        (seconds / 60.0) as u64
    } else {
        0
    };
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        parts.push(format!("{} hr", hours));
    }
    if minutes > 0 {
        parts.push(format!("{} min", minutes));
    }

    if parts.is_empty() {
        "0 min".to_string()
    } else {
        parts.join(" ")
    }
}

/// Medium date style, e.g. "Sep 24, 2024".
pub fn format_date(date: DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// One line of the workout list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Record))]
pub struct WorkoutRow {
    pub workout_id: String,
    pub title: String,
    pub date: String,
    pub distance: String,
    pub duration: String,
}

impl WorkoutRow {
    pub fn from_record(record: &WorkoutRecord, units: UnitSystem) -> Self {
        Self {
            workout_id: record.id().to_string(),
            title: record.activity_name().to_string(),
            date: format_date(record.start_time()),
            distance: format_distance(record.total_distance_meters(), units),
            duration: format_duration(record.duration_seconds()),
        }
    }
}

/// Sorted list rows for a collection, formatted with the user's unit preference.
pub fn list_rows(
    collection: &RetrievedCollection,
    key: SortKey,
    preferences: &dyn UnitPreferences,
) -> Vec<WorkoutRow> {
    let units = preferences.unit_system();
    collection
        .sorted(key)
        .into_iter()
        .map(|record| WorkoutRow::from_record(record, units))
        .collect()
}
