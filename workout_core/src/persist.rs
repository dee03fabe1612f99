//! Snapshot persistence for the workout store.
//!
//! A backend only ever sees whole snapshots: it returns the full workout list
//! on load and receives the full list on save.

use crate::{Error, Result, Workout};
use fs2::FileExt;
use serde_json::Value;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Load and save whole workout snapshots
pub trait SnapshotStore {
    fn load(&self) -> Result<Vec<Workout>>;
    fn save(&mut self, workouts: &[Workout]) -> Result<()>;
}

/// JSON array file with file locking and atomic replacement
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    /// Read the snapshot under a shared lock
    ///
    /// A missing file is an empty snapshot. A file that is not a JSON array is
    /// an error, so the caller can keep what it already has. Individual records
    /// that do not parse are skipped with a warning.
    fn load(&self) -> Result<Vec<Workout>> {
        if !self.path.exists() {
            tracing::info!("No workout file at {:?}, starting empty", self.path);
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<Value> = serde_json::from_str(&contents).map_err(|e| {
            Error::Persistence(format!("Unreadable workout file {:?}: {}", self.path, e))
        })?;

        let mut workouts = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<Workout>(record) {
                Ok(workout) => workouts.push(workout),
                Err(e) => {
                    tracing::warn!("Skipping workout record {}: {}", index, e);
                }
            }
        }

        tracing::debug!("Read {} workouts from {:?}", workouts.len(), self.path);
        Ok(workouts)
    }

    /// Atomically replace the snapshot
    ///
    /// Writes to a temp file in the same directory under an exclusive lock,
    /// syncs it, then renames it over the old file.
    fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent)?;

        let temp = NamedTempFile::new_in(&parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, workouts)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} workouts to {:?}", workouts.len(), self.path);
        Ok(())
    }
}

/// Snapshot held in memory, for embedding and tests
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    workouts: Vec<Workout>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new(workouts: Vec<Workout>) -> Self {
        Self {
            workouts,
            ..Self::default()
        }
    }

    /// Make every subsequent save fail, simulating an unavailable backend
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }

    /// Last saved snapshot
    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Vec<Workout>> {
        Ok(self.workouts.clone())
    }

    fn save(&mut self, workouts: &[Workout]) -> Result<()> {
        if self.fail_saves {
            return Err(Error::Persistence("memory store is refusing saves".into()));
        }
        self.workouts = workouts.to_vec();
        self.saves += 1;
        Ok(())
    }
}
