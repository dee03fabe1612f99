//! Per-workout progress and duration.

use crate::{DurationPolicy, Workout};

/// Percentage of a workout's exercises marked complete, 0 to 100.
///
/// Rounds half up and is 0 for a workout without exercises.
pub fn compute_progress(workout: &Workout) -> u8 {
    percentage(workout.completed_exercises(), workout.exercises.len())
}

/// `round(100 * part / whole)` with half-up rounding, 0 when `whole` is 0
pub fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let part = part.min(whole) as u64;
    let whole = whole as u64;
    ((200 * part + whole) / (2 * whole)) as u8
}

/// Duration in minutes used for aggregation
pub fn effective_duration(workout: &Workout, policy: DurationPolicy) -> u32 {
    match (workout.duration, policy) {
        (Some(minutes), _) => minutes,
        (None, DurationPolicy::Zero) => 0,
        (None, DurationPolicy::Estimate { minutes_per_exercise }) => {
            (workout.exercises.len() as u32).saturating_mul(minutes_per_exercise)
        }
    }
}
