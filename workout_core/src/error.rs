//! Error types for the workout_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for workout_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No workout with the given id exists in the store
    #[error("Workout not found: {0}")]
    WorkoutNotFound(String),

    /// Exercise index does not address an exercise of the workout
    #[error("Exercise index {index} out of range for workout {workout_id} ({len} exercises)")]
    ExerciseOutOfRange {
        workout_id: String,
        index: usize,
        len: usize,
    },

    /// A workout with this id is already in the store
    #[error("Duplicate workout id: {0}")]
    DuplicateWorkout(String),

    /// The snapshot backend failed to load or save
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for the not-found family (unknown workout, stale exercise index)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::WorkoutNotFound(_) | Error::ExerciseOutOfRange { .. }
        )
    }
}
