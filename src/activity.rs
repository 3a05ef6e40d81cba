//! Activity type codes reported by the fitness store and their display names.

/// Label for codes outside the table.
pub const UNKNOWN_ACTIVITY: &str = "Unknown";

/// Display names for activity codes 1..=58, indexed by `code - 1`.
const ACTIVITY_TYPE_NAMES: [&str; 58] = [
    "American Football",
    "Archery",
    "Australian Football",
    "Badminton",
    "Baseball",
    "Basketball",
    "Bowling",
    "Boxing",
    "Climbing",
    "Cricket",
    "Cross Training",
    "Curling",
    "Cycling",
    "Dance",
    "Dance Inspired Training",
    "Elliptical",
    "Equestrian Sports",
    "Fencing",
    "Fishing",
    "Functional Strength Training",
    "Golf",
    "Gymnastics",
    "Handball",
    "Hiking",
    "Hockey",
    "Hunting",
    "Lacrosse",
    "Martial Arts",
    "Mind and Body",
    "Mixed Metabolic Cardio Training",
    "Paddle Sports",
    "Play",
    "Preparation and Recovery",
    "Racquetball",
    "Rowing",
    "Rugby",
    "Running",
    "Sailing",
    "Skating Sports",
    "Snow Sports",
    "Soccer",
    "Softball",
    "Squash",
    "Stair Climbing",
    "Surfing Sports",
    "Swimming",
    "Table Tennis",
    "Tennis",
    "Track and Field",
    "Traditional Strength Training",
    "Volleyball",
    "Walking",
    "Water Fitness",
    "Water Polo",
    "Water Sports",
    "Wrestling",
    "Yoga",
    "Barre",
];

/// Display name for an activity code, or `"Unknown"`.
///
/// ```rust
/// use workout_mapper::activity_type_name;
///
/// assert_eq!(activity_type_name(37), "Running");
/// assert_eq!(activity_type_name(3000), "Unknown");
/// ```
pub fn activity_type_name(code: u32) -> &'static str {
    (code as usize)
        .checked_sub(1)
        .and_then(|index| ACTIVITY_TYPE_NAMES.get(index))
        .copied()
        .unwrap_or(UNKNOWN_ACTIVITY)
}
