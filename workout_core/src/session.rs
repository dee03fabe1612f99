//! A loaded workout store paired with the backend it persists to.

use crate::persist::SnapshotStore;
use crate::{Error, Result, WorkoutStore};

/// Owns the in-memory store for the lifetime of a session
///
/// Mutations go through [`TrackerSession::apply`], which saves a snapshot
/// after every successful change. Mutations are applied in memory
/// immediately and are not rolled back when the save fails.
pub struct TrackerSession<S: SnapshotStore> {
    store: WorkoutStore,
    backend: S,
}

impl<S: SnapshotStore> TrackerSession<S> {
    /// Load the backend's snapshot into a fresh store
    pub fn open(backend: S) -> Result<Self> {
        let workouts = backend.load()?;
        let store = WorkoutStore::from_snapshot(workouts);
        tracing::info!("Opened session with {} workouts", store.len());
        Ok(Self { store, backend })
    }

    pub fn store(&self) -> &WorkoutStore {
        &self.store
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Run a mutation against the store, then persist the result
    ///
    /// Nothing is saved when `f` fails. When the save itself fails the
    /// mutation stays applied and [`Error::Persistence`] is returned.
    pub fn apply<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut WorkoutStore) -> Result<T>,
    {
        let value = f(&mut self.store)?;
        self.save()?;
        Ok(value)
    }

    /// Write the current store to the backend
    pub fn save(&mut self) -> Result<()> {
        let snapshot = self.store.snapshot();
        self.backend.save(&snapshot).map_err(|e| {
            tracing::error!("Failed to save workouts, keeping in-memory state: {}", e);
            match e {
                Error::Persistence(msg) => Error::Persistence(msg),
                other => Error::Persistence(other.to_string()),
            }
        })
    }

    /// Replace the store with the backend's current snapshot
    ///
    /// On failure the previous store is kept.
    pub fn reload(&mut self) -> Result<()> {
        match self.backend.load() {
            Ok(workouts) => {
                self.store = WorkoutStore::from_snapshot(workouts);
                tracing::debug!("Reloaded {} workouts", self.store.len());
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Reload failed, keeping last good state: {}", e);
                Err(e)
            }
        }
    }
}
