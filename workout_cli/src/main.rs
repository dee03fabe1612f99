use clap::{Parser, Subcommand};
use std::path::PathBuf;
use workout_core::dates::day_key;
use workout_core::export::export_workouts_csv;
use workout_core::*;

#[derive(Parser)]
#[command(name = "wkt")]
#[command(about = "Workout progress and statistics tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a workout
    Add {
        #[arg(long)]
        name: String,

        /// Scheduled date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Duration in minutes
        #[arg(long)]
        duration: Option<u32>,

        #[arg(long)]
        muscle_group: Option<String>,

        /// Exercise as NAME[:SETS[:REPS[:REST]]], repeatable
        #[arg(long = "exercise", value_parser = parse_exercise)]
        exercises: Vec<Exercise>,
    },

    /// List all workouts
    List,

    /// Show one workout with its exercises
    Show { id: String },

    /// Mark an exercise complete (or incomplete with --undo)
    Check {
        id: String,
        index: usize,

        #[arg(long)]
        undo: bool,
    },

    /// Mark a whole workout complete (or incomplete with --undo)
    Complete {
        id: String,

        #[arg(long)]
        undo: bool,
    },

    /// Clear all completion state of a workout
    Reset { id: String },

    /// Replace the exercises of a workout
    Edit {
        id: String,

        /// Exercise as NAME[:SETS[:REPS[:REST]]], repeatable
        #[arg(long = "exercise", value_parser = parse_exercise)]
        exercises: Vec<Exercise>,
    },

    /// Delete a workout
    Remove { id: String },

    /// Show aggregate statistics
    Stats {
        /// week, month, year or all (defaults to the configured period)
        #[arg(long, value_parser = parse_period)]
        period: Option<Period>,

        /// Print statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export workouts to CSV
    Export {
        #[arg(long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    workout_core::logging::init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(data_dir) = cli.data_dir {
        config.data.data_dir = data_dir;
    }
    tracing::debug!("Using workout file {:?}", config.workouts_path());

    let mut session = TrackerSession::open(JsonFileStore::new(config.workouts_path()))?;

    match cli.command {
        Commands::Add {
            name,
            date,
            duration,
            muscle_group,
            exercises,
        } => cmd_add(
            &mut session,
            NewWorkout {
                id: None,
                name,
                date,
                duration,
                muscle_group,
                exercises,
            },
        ),
        Commands::List => {
            cmd_list(session.store());
            Ok(())
        }
        Commands::Show { id } => cmd_show(session.store(), &id),
        Commands::Check { id, index, undo } => {
            let change = session.apply(|store| store.toggle_exercise(&id, index, !undo))?;
            report_change(&id, &change);
            Ok(())
        }
        Commands::Complete { id, undo } => {
            let change = session.apply(|store| store.toggle_workout(&id, !undo))?;
            report_change(&id, &change);
            Ok(())
        }
        Commands::Reset { id } => {
            let change = session.apply(|store| store.reset_progress(&id))?;
            report_change(&id, &change);
            Ok(())
        }
        Commands::Edit { id, exercises } => {
            let change = session.apply(|store| store.replace_exercises(&id, exercises))?;
            report_change(&id, &change);
            Ok(())
        }
        Commands::Remove { id } => {
            let removed = session.apply(|store| store.remove(&id))?;
            println!("✓ Removed {} ({})", removed.id, removed.name);
            Ok(())
        }
        Commands::Stats { period, json } => {
            let options = config.stats_options(period);
            let stats = WorkoutStatistics::compute_now(session.store(), &options);
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                display_stats(&stats);
            }
            Ok(())
        }
        Commands::Export { out } => {
            let count = export_workouts_csv(
                &out,
                session.store().workouts(),
                config.categories.separators.as_slice(),
            )?;
            println!("✓ Exported {} workouts", count);
            println!("  CSV: {}", out.display());
            Ok(())
        }
    }
}

fn cmd_add(session: &mut TrackerSession<JsonFileStore>, new: NewWorkout) -> Result<()> {
    let id = session.apply(|store| store.add(new).map(|w| w.id.clone()))?;
    println!("✓ Added workout {}", id);
    Ok(())
}

fn cmd_list(store: &WorkoutStore) {
    if store.is_empty() {
        println!("No workouts yet.");
        return;
    }

    for workout in store.iter() {
        println!(
            "{} {:>3}%  {}  {}  [{}]",
            if workout.completed { "✓" } else { "·" },
            workout.progress,
            workout.date.as_deref().unwrap_or("----------"),
            workout.name,
            workout.id
        );
    }
}

fn cmd_show(store: &WorkoutStore, id: &str) -> Result<()> {
    let workout = store
        .get(id)
        .ok_or_else(|| Error::WorkoutNotFound(id.to_string()))?;

    println!("{}  [{}]", workout.name, workout.id);
    if let Some(ref date) = workout.date {
        println!("  Date: {}", date);
    }
    if let Some(duration) = workout.duration {
        println!("  Duration: {} min", duration);
    }
    println!("  Progress: {}%", workout.progress);
    match workout.completed_at {
        Some(ref at) => println!("  Completed: {}", at),
        None => println!("  Completed: no"),
    }
    println!();

    for (index, exercise) in workout.exercises.iter().enumerate() {
        let params: Vec<String> = [
            exercise.sets.as_ref().map(|v| format!("{} sets", v)),
            exercise.reps.as_ref().map(|v| format!("{} reps", v)),
            exercise.rest.as_ref().map(|v| format!("{} rest", v)),
        ]
        .into_iter()
        .flatten()
        .collect();

        println!(
            "  {} [{}] {}{}",
            index,
            if exercise.completed { "x" } else { " " },
            exercise.name,
            if params.is_empty() {
                String::new()
            } else {
                format!("  ({})", params.join(", "))
            }
        );
    }

    Ok(())
}

fn report_change(id: &str, change: &CompletionChange) {
    println!("✓ Workout {} at {}%", id, change.progress);
    if change.just_completed() {
        println!("  Workout complete!");
    } else if change.just_reopened() {
        println!("  Workout reopened");
    }
}

fn display_stats(stats: &WorkoutStatistics) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  STATISTICS ({:?})", stats.period);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  Workouts completed: {}", stats.total_workouts);
    println!(
        "  Total duration: {} min (avg {} min)",
        stats.total_duration, stats.average_duration
    );
    println!("  Streak: {} days", stats.streak_days);
    println!("  This month: {}%", stats.monthly_progress);
    println!("  Completion rate: {}%", stats.completion_rate);
    println!("  Weekly trend: {:?}", stats.weekly_trend);

    if !stats.muscle_group_distribution.is_empty() {
        println!();
        println!("  Muscle groups:");
        for group in &stats.muscle_group_distribution {
            println!(
                "    {:<16} {:>3} workouts, {} min",
                group.name, group.count, group.total_duration
            );
        }
    }

    println!();
    println!("  Activity:");
    for day in &stats.weekly_activity {
        println!(
            "    {} {} {}{}",
            day.weekday,
            day_key(day.date),
            "■".repeat(day.count),
            if day.is_today { "  ← today" } else { "" }
        );
    }
    println!();
}

fn parse_exercise(raw: &str) -> std::result::Result<Exercise, String> {
    let mut parts = raw.split(':');
    let name = parts.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Err(format!("exercise needs a name: {:?}", raw));
    }

    let mut value = || {
        parts
            .next()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| match p.parse::<u32>() {
                Ok(n) => TrainingValue::from(n),
                Err(_) => TrainingValue::from(p),
            })
    };

    Ok(Exercise {
        sets: value(),
        reps: value(),
        rest: value(),
        ..Exercise::new(name)
    })
}

fn parse_period(s: &str) -> std::result::Result<Period, String> {
    s.parse::<Period>().map_err(|e| e.to_string())
}
