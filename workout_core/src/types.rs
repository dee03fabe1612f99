//! Core domain types for the workout tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Workouts and their nested exercises (the persisted data model)
//! - Statistics periods, trends and the aggregate statistics view
//!
//! Persisted records use camelCase keys so that snapshots written by other
//! clients of the same document store round-trip without loss.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Exercise Types
// ============================================================================

/// A training parameter (sets, reps, rest). Stored as given, never computed over.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TrainingValue {
    Number(serde_json::Number),
    Text(String),
}

impl From<u32> for TrainingValue {
    fn from(value: u32) -> Self {
        TrainingValue::Number(value.into())
    }
}

impl From<&str> for TrainingValue {
    fn from(value: &str) -> Self {
        TrainingValue::Text(value.to_string())
    }
}

impl std::fmt::Display for TrainingValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingValue::Number(n) => write!(f, "{}", n),
            TrainingValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A single training item nested inside a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<TrainingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<TrainingValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<TrainingValue>,
    #[serde(default)]
    pub completed: bool,
    /// Fields written by other clients that this crate does not interpret
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// ============================================================================
// Workout Types
// ============================================================================

/// A named, dated collection of exercises with aggregate completion state.
///
/// Date fields are kept as the raw strings found in the snapshot; they are
/// interpreted through [`crate::dates::resolve_workout_time`] so that one
/// malformed record never aborts a computation over the whole store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: String,
    #[serde(default, alias = "title")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Minutes. Missing durations may be estimated from the exercise count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub muscle_group: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Workout {
    /// Number of exercises marked complete
    pub fn completed_exercises(&self) -> usize {
        self.exercises.iter().filter(|e| e.completed).count()
    }

    /// True when there is at least one exercise and every one is complete
    pub fn all_exercises_completed(&self) -> bool {
        !self.exercises.is_empty() && self.exercises.iter().all(|e| e.completed)
    }
}

/// Input for creating a workout through the store
#[derive(Clone, Debug, Default)]
pub struct NewWorkout {
    /// Explicit id; a UUID is generated when absent
    pub id: Option<String>,
    pub name: String,
    pub date: Option<String>,
    pub duration: Option<u32>,
    pub muscle_group: Option<String>,
    pub exercises: Vec<Exercise>,
}

// ============================================================================
// Statistics Types
// ============================================================================

/// Trailing window used for windowed statistics
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
    All,
}

impl std::str::FromStr for Period {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(crate::Error::Other(format!("Unknown period: {}", other))),
        }
    }
}

/// Direction of the weekly completion count compared to the week before
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// How to treat workouts that have no recorded duration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DurationPolicy {
    /// Missing durations count as zero minutes
    Zero,
    /// Missing durations are estimated as exercise count times the given minutes
    Estimate { minutes_per_exercise: u32 },
}

/// Completed workouts sharing one muscle-group label
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupStat {
    pub name: String,
    pub count: usize,
    pub total_duration: u32,
}

/// Completed-workout count for one calendar day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayActivity {
    pub date: NaiveDate,
    /// Short weekday label, e.g. "Mon"
    pub weekday: String,
    pub count: usize,
    pub is_today: bool,
}

/// Aggregate statistics over a workout store, ready for presentation
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStatistics {
    pub period: Period,
    pub total_workouts: usize,
    pub total_duration: u32,
    pub average_duration: u32,
    pub streak_days: u32,
    pub monthly_progress: u8,
    pub completion_rate: u8,
    pub weekly_trend: Trend,
    pub muscle_group_distribution: Vec<MuscleGroupStat>,
    pub weekly_activity: Vec<DayActivity>,
}
