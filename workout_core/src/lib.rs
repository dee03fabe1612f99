#![forbid(unsafe_code)]

//! Core domain model and business logic for the wkt workout tracker.
//!
//! This crate provides:
//! - Domain types (workouts, exercises, statistics views)
//! - The workout store and completion tracking
//! - Progress and statistics computation
//! - Persistence (JSON snapshots, CSV export) and configuration

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod dates;
pub mod category;
pub mod progress;
pub mod store;
pub mod completion;
pub mod statistics;
pub mod persist;
pub mod session;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use store::WorkoutStore;
pub use completion::CompletionChange;
pub use progress::{compute_progress, effective_duration};
pub use statistics::StatsOptions;
pub use persist::{JsonFileStore, MemoryStore, SnapshotStore};
pub use session::TrackerSession;
