//! Completion tracking for workouts and their exercises.
//!
//! Every mutator keeps three fields consistent with the exercise flags:
//! - `completed` is true iff all exercises are complete (or, for a workout
//!   without exercises, when it was marked complete explicitly)
//! - `completedAt` is present iff `completed` is true
//! - `progress` equals [`compute_progress`]
//!
//! Unknown workouts and stale exercise indices are reported as errors and
//! leave the store untouched.

use crate::progress::compute_progress;
use crate::{Error, Result, Workout, WorkoutStore};
use chrono::{DateTime, SecondsFormat, Utc};

/// Workout-level outcome of a completion mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionChange {
    pub was_completed: bool,
    pub completed: bool,
    pub progress: u8,
}

impl CompletionChange {
    /// The workout flipped from open to complete
    pub fn just_completed(&self) -> bool {
        !self.was_completed && self.completed
    }

    /// The workout flipped from complete back to open
    pub fn just_reopened(&self) -> bool {
        self.was_completed && !self.completed
    }
}

impl WorkoutStore {
    /// Mark one exercise of a workout complete or incomplete
    pub fn toggle_exercise(
        &mut self,
        workout_id: &str,
        exercise_index: usize,
        completed: bool,
    ) -> Result<CompletionChange> {
        self.toggle_exercise_at(workout_id, exercise_index, completed, Utc::now())
    }

    /// [`Self::toggle_exercise`] with an explicit clock
    pub fn toggle_exercise_at(
        &mut self,
        workout_id: &str,
        exercise_index: usize,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<CompletionChange> {
        let workout = self.get_mut(workout_id).inspect_err(log_rejected)?;

        let len = workout.exercises.len();
        let Some(exercise) = workout.exercises.get_mut(exercise_index) else {
            let err = Error::ExerciseOutOfRange {
                workout_id: workout_id.to_string(),
                index: exercise_index,
                len,
            };
            log_rejected(&err);
            return Err(err);
        };
        exercise.completed = completed;

        let change = sync_with_exercises(workout, now);
        tracing::debug!(
            "Exercise {} of workout {} set to {} ({}%)",
            exercise_index,
            workout_id,
            completed,
            change.progress
        );
        if change.just_completed() {
            tracing::info!("Workout {} completed", workout_id);
        }
        Ok(change)
    }

    /// Mark a whole workout complete or incomplete, cascading to every exercise
    pub fn toggle_workout(&mut self, workout_id: &str, completed: bool) -> Result<CompletionChange> {
        self.toggle_workout_at(workout_id, completed, Utc::now())
    }

    /// [`Self::toggle_workout`] with an explicit clock
    pub fn toggle_workout_at(
        &mut self,
        workout_id: &str,
        completed: bool,
        now: DateTime<Utc>,
    ) -> Result<CompletionChange> {
        let workout = self.get_mut(workout_id).inspect_err(log_rejected)?;
        let was_completed = workout.completed;

        for exercise in &mut workout.exercises {
            exercise.completed = completed;
        }
        workout.progress = compute_progress(workout);
        set_completed(workout, completed, now);

        tracing::info!(
            "Workout {} marked {}",
            workout_id,
            if completed { "complete" } else { "incomplete" }
        );
        Ok(CompletionChange {
            was_completed,
            completed: workout.completed,
            progress: workout.progress,
        })
    }

    /// Clear all completion state of a workout
    pub fn reset_progress(&mut self, workout_id: &str) -> Result<CompletionChange> {
        self.toggle_workout(workout_id, false)
    }

    /// [`Self::reset_progress`] with an explicit clock
    pub fn reset_progress_at(
        &mut self,
        workout_id: &str,
        now: DateTime<Utc>,
    ) -> Result<CompletionChange> {
        self.toggle_workout_at(workout_id, false, now)
    }
}

/// Recompute progress and workout-level completion from the exercise flags
///
/// A workout without exercises keeps its explicit completion state.
pub(crate) fn sync_with_exercises(workout: &mut Workout, now: DateTime<Utc>) -> CompletionChange {
    let was_completed = workout.completed;
    workout.progress = compute_progress(workout);

    if !workout.exercises.is_empty() {
        let all_done = workout.all_exercises_completed();
        set_completed(workout, all_done, now);
    }

    CompletionChange {
        was_completed,
        completed: workout.completed,
        progress: workout.progress,
    }
}

/// Set the completion flag, stamping or clearing `completedAt`
///
/// An already completed workout keeps its original stamp.
fn set_completed(workout: &mut Workout, completed: bool, now: DateTime<Utc>) {
    if completed {
        if !workout.completed || workout.completed_at.is_none() {
            workout.completed_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
        }
        workout.completed = true;
    } else {
        workout.completed = false;
        workout.completed_at = None;
    }
}

fn log_rejected(err: &Error) {
    tracing::warn!("Completion change rejected: {}", err);
}
