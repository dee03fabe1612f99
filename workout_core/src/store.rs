//! In-memory workout store.
//!
//! The store exclusively owns every workout of a session. It is built from a
//! persisted snapshot, handed by reference to the completion tracker and the
//! statistics functions, and cloned back out as a snapshot for persistence.

use crate::completion::{self, CompletionChange};
use crate::progress::compute_progress;
use crate::{dates, Error, Exercise, NewWorkout, Result, Workout};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashSet;

/// Owned collection of workouts with unique ids
#[derive(Clone, Debug, Default)]
pub struct WorkoutStore {
    workouts: Vec<Workout>,
}

impl WorkoutStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a persisted snapshot
    ///
    /// Derived state is repaired on the way in: progress is recomputed,
    /// completion is reconciled with the exercises, and records with an id
    /// already seen are dropped (first occurrence wins).
    pub fn from_snapshot(workouts: Vec<Workout>) -> Self {
        Self::from_snapshot_at(workouts, Utc::now())
    }

    /// [`Self::from_snapshot`] with an explicit clock
    pub fn from_snapshot_at(workouts: Vec<Workout>, now: DateTime<Utc>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(workouts.len());

        for mut workout in workouts {
            if !seen.insert(workout.id.clone()) {
                tracing::warn!("Dropping workout with duplicate id {}", workout.id);
                continue;
            }
            normalize(&mut workout, now);
            kept.push(workout);
        }

        tracing::debug!("Loaded {} workouts into store", kept.len());
        Self { workouts: kept }
    }

    /// Copy of all workouts, for handing to a persistence backend
    pub fn snapshot(&self) -> Vec<Workout> {
        self.workouts.clone()
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn iter(&self) -> impl Iterator<Item = &Workout> {
        self.workouts.iter()
    }

    pub fn len(&self) -> usize {
        self.workouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workouts.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut Workout> {
        self.workouts
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| Error::WorkoutNotFound(id.to_string()))
    }

    /// Create a workout, assigning an id when none is given
    pub fn add(&mut self, new: NewWorkout) -> Result<&Workout> {
        self.add_at(new, Utc::now())
    }

    /// [`Self::add`] with an explicit clock
    pub fn add_at(&mut self, new: NewWorkout, now: DateTime<Utc>) -> Result<&Workout> {
        let id = new
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        if self.get(&id).is_some() {
            return Err(Error::DuplicateWorkout(id));
        }

        let mut workout = Workout {
            id,
            name: new.name,
            date: new.date,
            created_at: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            duration: new.duration,
            exercises: new.exercises,
            muscle_group: new.muscle_group,
            ..Workout::default()
        };
        completion::sync_with_exercises(&mut workout, now);

        tracing::info!("Added workout {} ({})", workout.id, workout.name);
        self.workouts.push(workout);

        let added = self.workouts.len() - 1;
        Ok(&self.workouts[added])
    }

    /// Replace the exercise list of a workout (editing)
    ///
    /// Progress and completion are recomputed from the new list. An empty
    /// list keeps whatever completion was set on the workout explicitly.
    pub fn replace_exercises(
        &mut self,
        id: &str,
        exercises: Vec<Exercise>,
    ) -> Result<CompletionChange> {
        self.replace_exercises_at(id, exercises, Utc::now())
    }

    /// [`Self::replace_exercises`] with an explicit clock
    pub fn replace_exercises_at(
        &mut self,
        id: &str,
        exercises: Vec<Exercise>,
        now: DateTime<Utc>,
    ) -> Result<CompletionChange> {
        let workout = self.get_mut(id)?;
        workout.exercises = exercises;
        let change = completion::sync_with_exercises(workout, now);
        tracing::info!(
            "Replaced exercises of workout {} ({} exercises, {}%)",
            id,
            workout.exercises.len(),
            workout.progress
        );
        Ok(change)
    }

    /// Remove a workout and its exercises
    pub fn remove(&mut self, id: &str) -> Result<Workout> {
        let position = self
            .workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| Error::WorkoutNotFound(id.to_string()))?;
        let removed = self.workouts.remove(position);
        tracing::info!("Removed workout {}", id);
        Ok(removed)
    }
}

/// Repair derived fields of a freshly loaded workout
fn normalize(workout: &mut Workout, now: DateTime<Utc>) {
    let progress = compute_progress(workout);
    if workout.progress != progress {
        tracing::debug!(
            "Workout {} stored progress {} differs from derived {}",
            workout.id,
            workout.progress,
            progress
        );
        workout.progress = progress;
    }

    if !workout.exercises.is_empty() {
        let all_done = workout.all_exercises_completed();
        if workout.completed != all_done {
            tracing::warn!(
                "Workout {} completion flag disagrees with its exercises; using exercises",
                workout.id
            );
            workout.completed = all_done;
        }
    }

    if workout.completed {
        let is_rfc3339 = workout
            .completed_at
            .as_deref()
            .is_some_and(|raw| DateTime::parse_from_rfc3339(raw.trim()).is_ok());
        if !is_rfc3339 {
            // Keep a readable stamp, else attribute the completion to the scheduled day
            let stamp = [
                workout.completed_at.as_deref(),
                workout.date.as_deref(),
                workout.created_at.as_deref(),
            ]
            .into_iter()
            .flatten()
            .find_map(dates::parse_timestamp)
            .and_then(dates::utc_stamp)
            .unwrap_or_else(|| now.to_rfc3339_opts(SecondsFormat::Millis, true));
            tracing::debug!("Stamped completedAt {} on workout {}", stamp, workout.id);
            workout.completed_at = Some(stamp);
        }
    } else if workout.completed_at.take().is_some() {
        tracing::debug!("Cleared stale completedAt on workout {}", workout.id);
    }
}
