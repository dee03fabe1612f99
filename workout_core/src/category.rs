//! Muscle-group labels for workouts.
//!
//! An explicit `muscleGroup` always wins. Otherwise the label is taken from
//! the workout name: "Push Day - Chest" splits on `-` and yields "Chest".
//! Names without a separator get no label and are left out of the
//! muscle-group distribution.

use crate::Workout;

/// Separators tried, in order, when no explicit muscle group is set
pub const DEFAULT_SEPARATORS: &[&str] = &["-", "+"];

/// Resolve the muscle-group label of a workout, if any
pub fn resolve_muscle_group<S: AsRef<str>>(workout: &Workout, separators: &[S]) -> Option<String> {
    if let Some(explicit) = workout.muscle_group.as_deref().map(str::trim) {
        if !explicit.is_empty() {
            return Some(explicit.to_string());
        }
    }

    derive_from_name(&workout.name, separators)
}

/// Second segment of `name` split on the first separator it contains
pub fn derive_from_name<S: AsRef<str>>(name: &str, separators: &[S]) -> Option<String> {
    let separator = separators
        .iter()
        .map(|s| s.as_ref())
        .filter(|s| !s.is_empty())
        .find(|s| name.contains(*s))?;

    name.split(separator)
        .nth(1)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
