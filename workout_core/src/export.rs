//! CSV export of workouts.

use crate::category::resolve_muscle_group;
use crate::dates::{day_key, resolve_workout_day};
use crate::{Result, Workout};
use std::io::Write;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    name: &'a str,
    day: Option<String>,
    completed: bool,
    completed_at: Option<&'a str>,
    progress: u8,
    exercises: usize,
    exercises_completed: usize,
    duration: Option<u32>,
    muscle_group: Option<String>,
}

impl<'a> CsvRow<'a> {
    fn new<S: AsRef<str>>(workout: &'a Workout, separators: &[S]) -> Self {
        CsvRow {
            id: &workout.id,
            name: &workout.name,
            day: resolve_workout_day(workout).map(day_key),
            completed: workout.completed,
            completed_at: workout.completed_at.as_deref(),
            progress: workout.progress,
            exercises: workout.exercises.len(),
            exercises_completed: workout.completed_exercises(),
            duration: workout.duration,
            muscle_group: resolve_muscle_group(workout, separators),
        }
    }
}

/// Write one CSV row per workout, with headers
///
/// Returns the number of rows written.
pub fn write_workouts_csv<W: Write, S: AsRef<str>>(
    writer: W,
    workouts: &[Workout],
    separators: &[S],
) -> Result<usize> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(writer);

    for workout in workouts {
        writer.serialize(CsvRow::new(workout, separators))?;
    }
    writer.flush()?;

    Ok(workouts.len())
}

/// Export workouts to a CSV file, replacing any existing file
pub fn export_workouts_csv<S: AsRef<str>>(
    path: &Path,
    workouts: &[Workout],
    separators: &[S],
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    let count = write_workouts_csv(&file, workouts, separators)?;
    file.sync_all()?;

    tracing::info!("Exported {} workouts to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::DEFAULT_SEPARATORS;
    use crate::{Exercise, WorkoutStore};

    fn store() -> WorkoutStore {
        let mut store = WorkoutStore::from_snapshot(vec![
            Workout {
                id: "a".into(),
                name: "Push - Chest".into(),
                date: Some("2024-05-01".into()),
                duration: Some(40),
                exercises: vec![Exercise::new("Bench"), Exercise::new("Dips")],
                ..Workout::default()
            },
            Workout {
                id: "b".into(),
                name: "Morning Run".into(),
                date: Some("broken".into()),
                ..Workout::default()
            },
        ]);
        store.toggle_exercise("a", 0, true).unwrap();
        store
    }

    #[test]
    fn test_write_rows() {
        let mut out = Vec::new();
        let count = write_workouts_csv(&mut out, store().workouts(), DEFAULT_SEPARATORS).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,day,completed,completed_at,progress,exercises,exercises_completed,duration,muscle_group")
        );
        assert_eq!(
            lines.next(),
            Some("a,Push - Chest,2024-05-01,false,,50,2,1,40,Chest")
        );
        assert_eq!(lines.next(), Some("b,Morning Run,,false,,0,0,0,,"));
    }

    #[test]
    fn test_export_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("out").join("workouts.csv");

        let count = export_workouts_csv(&path, store().workouts(), DEFAULT_SEPARATORS).unwrap();
        assert_eq!(count, 2);

        let reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(reader.into_records().count(), 2);
    }
}
