//! Statistics over a collection of workouts.
//!
//! Everything here is a pure read. Each function takes the current local
//! wall-clock time explicitly; [`WorkoutStatistics::compute_now`] supplies it
//! from the system clock.
//!
//! Workouts are attributed to a day through
//! [`crate::dates::resolve_workout_time`]. Records whose dates cannot be
//! resolved are skipped by every date-dependent statistic.

use crate::category::{resolve_muscle_group, DEFAULT_SEPARATORS};
use crate::dates::{
    days_between, days_in_month, local_now, month_start, period_start, resolve_workout_day,
    resolve_workout_time, scheduled_day,
};
use crate::progress::{effective_duration, percentage};
use crate::{
    DayActivity, DurationPolicy, MuscleGroupStat, Period, Trend, Workout, WorkoutStatistics,
    WorkoutStore,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};

/// Default cap on how many days a streak search walks back
pub const DEFAULT_STREAK_LOOKBACK_DAYS: u32 = 30;

/// Default length of the per-day activity series
pub const DEFAULT_ACTIVITY_DAYS: u32 = 7;

/// Knobs for [`WorkoutStatistics::compute`]
#[derive(Clone, Debug)]
pub struct StatsOptions {
    /// Window for totals and the muscle-group distribution
    pub period: Period,
    /// Longest streak that will be reported; 0 disables the cap
    pub streak_lookback_days: u32,
    pub activity_days: u32,
    pub duration_policy: DurationPolicy,
    pub separators: Vec<String>,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            period: Period::default(),
            streak_lookback_days: DEFAULT_STREAK_LOOKBACK_DAYS,
            activity_days: DEFAULT_ACTIVITY_DAYS,
            duration_policy: DurationPolicy::Zero,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Workouts marked complete
pub fn completed_workouts(workouts: &[Workout]) -> Vec<&Workout> {
    workouts.iter().filter(|w| w.completed).collect()
}

/// Workouts whose resolved time falls in the trailing `period` ending at `now`
pub fn by_period<'a, I>(workouts: I, period: Period, now: NaiveDateTime) -> Vec<&'a Workout>
where
    I: IntoIterator<Item = &'a Workout>,
{
    let start = period_start(period, now);
    workouts
        .into_iter()
        .filter(|w| match resolve_workout_time(w) {
            Some(t) => t <= now && start.map_or(true, |s| t >= s),
            None => false,
        })
        .collect()
}

/// Distinct days with at least one completed workout
fn active_days<'a, I>(workouts: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = &'a Workout>,
{
    workouts
        .into_iter()
        .filter(|w| w.completed)
        .filter_map(resolve_workout_day)
        .collect()
}

/// Consecutive active days ending today or yesterday
///
/// Walks back from the most recent active day and stops at the first day
/// without a completed workout, or once `max_lookback` days have been
/// counted (0 means no cap). Completions dated after `today` are ignored.
pub fn streak_days(workouts: &[Workout], today: NaiveDate, max_lookback: u32) -> u32 {
    let days: BTreeSet<NaiveDate> = active_days(workouts)
        .into_iter()
        .filter(|d| *d <= today)
        .collect();

    let Some(&latest) = days.iter().next_back() else {
        return 0;
    };
    if days_between(today, latest) > 1 {
        return 0;
    }

    let mut streak = 0;
    let mut day = latest;
    while days.contains(&day) && (max_lookback == 0 || streak < max_lookback) {
        streak += 1;
        match day.pred_opt() {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// Share of the elapsed days of the current month that had a completed workout
pub fn monthly_progress(workouts: &[Workout], today: NaiveDate) -> u8 {
    let first = month_start(today);
    let active = active_days(workouts)
        .range(first..=today)
        .count();
    let elapsed = today.day0() + 1;
    percentage(active, elapsed.min(days_in_month(today)) as usize)
}

/// Completed share of the workouts scheduled on or before today
///
/// Scheduling follows `date` (else `createdAt`), never `completedAt`.
pub fn completion_rate(workouts: &[Workout], today: NaiveDate) -> u8 {
    let scheduled: Vec<&Workout> = workouts
        .iter()
        .filter(|w| scheduled_day(w).is_some_and(|d| d <= today))
        .collect();
    let completed = scheduled.iter().filter(|w| w.completed).count();
    percentage(completed, scheduled.len())
}

/// Completed workouts this week compared with the seven days before
pub fn weekly_trend(workouts: &[Workout], now: NaiveDateTime) -> Trend {
    let week_start = now - Duration::days(7);
    let previous_start = now - Duration::days(14);

    let mut current = 0usize;
    let mut previous = 0usize;
    for t in workouts
        .iter()
        .filter(|w| w.completed)
        .filter_map(resolve_workout_time)
    {
        if t >= week_start && t <= now {
            current += 1;
        } else if t >= previous_start && t < week_start {
            previous += 1;
        }
    }

    match current.cmp(&previous) {
        std::cmp::Ordering::Greater => Trend::Up,
        std::cmp::Ordering::Less => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Stable,
    }
}

/// Completed workouts in `period` grouped by muscle-group label
///
/// Workouts without a resolvable label are left out. Groups are ordered by
/// count, largest first, then by name.
pub fn muscle_group_distribution<S: AsRef<str>>(
    workouts: &[Workout],
    period: Period,
    now: NaiveDateTime,
    policy: DurationPolicy,
    separators: &[S],
) -> Vec<MuscleGroupStat> {
    let mut groups: HashMap<String, MuscleGroupStat> = HashMap::new();
    let mut unlabeled = 0usize;

    for workout in by_period(completed_workouts(workouts), period, now) {
        let Some(label) = resolve_muscle_group(workout, separators) else {
            unlabeled += 1;
            continue;
        };
        let group = groups.entry(label.clone()).or_insert_with(|| MuscleGroupStat {
            name: label,
            count: 0,
            total_duration: 0,
        });
        group.count += 1;
        group.total_duration = group
            .total_duration
            .saturating_add(effective_duration(workout, policy));
    }

    if unlabeled > 0 {
        tracing::debug!(
            "{} completed workouts without a muscle group left out of distribution",
            unlabeled
        );
    }

    let mut distribution: Vec<MuscleGroupStat> = groups.into_values().collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    distribution
}

/// Completed-workout counts for the `days` calendar days ending today
///
/// Always returns exactly `days` entries, oldest first, zero-filled.
pub fn daily_activity(workouts: &[Workout], today: NaiveDate, days: u32) -> Vec<DayActivity> {
    let mut counts: HashMap<NaiveDate, usize> = HashMap::new();
    for day in workouts
        .iter()
        .filter(|w| w.completed)
        .filter_map(resolve_workout_day)
    {
        *counts.entry(day).or_default() += 1;
    }

    (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_signed(Duration::days(offset as i64)))
        .map(|date| DayActivity {
            date,
            weekday: date.format("%a").to_string(),
            count: counts.get(&date).copied().unwrap_or(0),
            is_today: date == today,
        })
        .collect()
}

impl WorkoutStatistics {
    /// Aggregate statistics of a store at `now`
    pub fn compute(store: &WorkoutStore, options: &StatsOptions, now: NaiveDateTime) -> Self {
        let workouts = store.workouts();
        let today = now.date();

        let windowed = by_period(completed_workouts(workouts), options.period, now);
        let total_workouts = windowed.len();
        let total_duration = windowed.iter().fold(0u32, |sum, w| {
            sum.saturating_add(effective_duration(w, options.duration_policy))
        });
        let average_duration = if total_workouts == 0 {
            0
        } else {
            let count = total_workouts as u64;
            ((2 * total_duration as u64 + count) / (2 * count)) as u32
        };

        let stats = Self {
            period: options.period,
            total_workouts,
            total_duration,
            average_duration,
            streak_days: streak_days(workouts, today, options.streak_lookback_days),
            monthly_progress: monthly_progress(workouts, today),
            completion_rate: completion_rate(workouts, today),
            weekly_trend: weekly_trend(workouts, now),
            muscle_group_distribution: muscle_group_distribution(
                workouts,
                options.period,
                now,
                options.duration_policy,
                options.separators.as_slice(),
            ),
            weekly_activity: daily_activity(workouts, today, options.activity_days),
        };

        tracing::debug!(
            "Computed statistics over {} workouts: {} completed in {:?}, streak {}",
            store.len(),
            stats.total_workouts,
            stats.period,
            stats.streak_days
        );
        stats
    }

    /// [`Self::compute`] at the current local time
    pub fn compute_now(store: &WorkoutStore, options: &StatsOptions) -> Self {
        Self::compute(store, options, local_now())
    }
}
