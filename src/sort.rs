//! Ordering of retrieved workouts for the list UI.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{WorkoutMeta, WorkoutRecord};

/// Sort key for the workout list. All keys sort descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ffi", derive(uniffi::Enum))]
pub enum SortKey {
    /// Most recent start time first
    Date,
    /// Farthest first; a workout without a recorded distance counts as 0 m
    #[default]
    Distance,
    /// Longest first
    Duration,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Distance, SortKey::Duration];

    /// Label shown in the sort picker.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Date => "Date",
            SortKey::Distance => "Distance",
            SortKey::Duration => "Time",
        }
    }

    /// Descending comparison of two workouts under this key.
    ///
    /// A missing or NaN distance or duration sorts as 0.
    pub fn compare(&self, a: &WorkoutMeta, b: &WorkoutMeta) -> Ordering {
        match self {
            SortKey::Date => b.start_time.cmp(&a.start_time),
            SortKey::Distance => {
                let da = or_zero(a.total_distance_meters.unwrap_or(0.0));
                let db = or_zero(b.total_distance_meters.unwrap_or(0.0));
                db.total_cmp(&da)
            }
            SortKey::Duration => or_zero(b.duration_seconds).total_cmp(&or_zero(a.duration_seconds)),
        }
    }
}

fn or_zero(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "distance" => Ok(SortKey::Distance),
            "time" | "duration" => Ok(SortKey::Duration),
            other => Err(format!("Unknown sort key: {}", other)),
        }
    }
}

/// Order workouts descending by `key` without touching the input.
///
/// The sort is stable: ties keep their input (pipeline) order.
pub fn sort_workouts(workouts: &[WorkoutRecord], key: SortKey) -> Vec<&WorkoutRecord> {
    let mut sorted: Vec<&WorkoutRecord> = workouts.iter().collect();
    sorted.sort_by(|a, b| key.compare(a.meta(), b.meta()));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{meta, record};

    fn ids(sorted: &[&WorkoutRecord]) -> Vec<String> {
        sorted.iter().map(|w| w.id().to_string()).collect()
    }

    fn sample() -> Vec<WorkoutRecord> {
        vec![
            record(meta("morning-run", 37, 9, Some(5000.0), 1800.0), "r1"),
            record(meta("walk", 52, 8, None, 2400.0), "r2"),
            record(meta("ride", 13, 7, Some(10000.0), 3600.0), "r3"),
            record(meta("short-run", 37, 6, Some(5000.0), 900.0), "r4"),
        ]
    }

    #[test]
    fn test_sort_by_date() {
        let workouts = sample();
        let sorted = sort_workouts(&workouts, SortKey::Date);
        assert_eq!(ids(&sorted), vec!["morning-run", "walk", "ride", "short-run"]);
    }

    #[test]
    fn test_sort_by_distance_missing_counts_as_zero() {
        let workouts = sample();
        let sorted = sort_workouts(&workouts, SortKey::Distance);
        // Equal 5000 m distances keep input order
        assert_eq!(ids(&sorted), vec!["ride", "morning-run", "short-run", "walk"]);
    }

    #[test]
    fn test_sort_by_duration() {
        let workouts = sample();
        let sorted = sort_workouts(&workouts, SortKey::Duration);
        assert_eq!(ids(&sorted), vec!["ride", "walk", "morning-run", "short-run"]);
    }

    #[test]
    fn test_sort_is_permutation_and_input_untouched() {
        let workouts = sample();
        let before = workouts.clone();
        for key in SortKey::ALL {
            let sorted = sort_workouts(&workouts, key);
            let mut got = ids(&sorted);
            got.sort();
            let mut expected: Vec<String> = before.iter().map(|w| w.id().to_string()).collect();
            expected.sort();
            assert_eq!(got, expected, "key {}", key);
        }
        assert_eq!(workouts, before);
    }

    #[test]
    fn test_nan_metrics_sort_as_zero() {
        let workouts = vec![
            record(meta("nan", 37, 9, Some(f64::NAN), f64::NAN), "r1"),
            record(meta("some", 37, 8, Some(100.0), 60.0), "r2"),
            record(meta("none", 37, 7, None, 0.0), "r3"),
        ];
        let by_distance = sort_workouts(&workouts, SortKey::Distance);
        assert_eq!(ids(&by_distance), vec!["some", "nan", "none"]);
        let by_duration = sort_workouts(&workouts, SortKey::Duration);
        assert_eq!(ids(&by_duration), vec!["some", "nan", "none"]);
    }

    #[test]
    fn test_sort_key_names() {
        assert_eq!("Time".parse::<SortKey>(), Ok(SortKey::Duration));
        assert_eq!("distance".parse::<SortKey>(), Ok(SortKey::Distance));
        assert_eq!(SortKey::Date.to_string(), "Date");
        assert!("pace".parse::<SortKey>().is_err());
        assert_eq!(SortKey::default(), SortKey::Distance);
    }
}
