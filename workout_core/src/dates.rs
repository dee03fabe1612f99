//! Calendar helpers and the resolved-date rule for workouts.
//!
//! All statistics are computed in local wall-clock time: RFC 3339 timestamps
//! are converted to the local zone, naive timestamps and plain dates are taken
//! as already local.

use crate::{Period, Workout};
use chrono::{
    DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime,
    SecondsFormat, TimeZone, Utc,
};

/// Parse an ISO date or timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (`2024-05-01T10:00:00.000Z`), naive ISO timestamps
/// (`2024-05-01T10:00:00`, `2024-05-01 10:00:00`) and plain dates
/// (`2024-05-01`, taken as midnight). Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Resolve the point in time a workout is attributed to.
///
/// Precedence is `completedAt`, then `date`, then `createdAt`. A field that is
/// present but unparsable is skipped in favour of the next one.
pub fn resolve_workout_time(workout: &Workout) -> Option<NaiveDateTime> {
    [
        workout.completed_at.as_deref(),
        workout.date.as_deref(),
        workout.created_at.as_deref(),
    ]
    .into_iter()
    .flatten()
    .find_map(parse_timestamp)
}

/// Calendar day of [`resolve_workout_time`]
pub fn resolve_workout_day(workout: &Workout) -> Option<NaiveDate> {
    resolve_workout_time(workout).map(|t| t.date())
}

/// Day a workout is planned for: its `date`, else the day it was created.
///
/// Unlike [`resolve_workout_day`] this ignores `completedAt`, so finishing a
/// future workout early does not move it into the past.
pub fn scheduled_day(workout: &Workout) -> Option<NaiveDate> {
    [workout.date.as_deref(), workout.created_at.as_deref()]
        .into_iter()
        .flatten()
        .find_map(parse_timestamp)
        .map(|t| t.date())
}

/// Format a local wall-clock time as a UTC RFC 3339 stamp with milliseconds
///
/// `None` when the local time does not exist (skipped by a DST change).
pub fn utc_stamp(local: NaiveDateTime) -> Option<String> {
    Local
        .from_local_datetime(&local)
        .earliest()
        .map(|t| t.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// `yyyy-MM-dd` key for a calendar day
pub fn day_key(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

/// Whole calendar days from `earlier` to `later` (negative if reversed)
pub fn days_between(later: NaiveDate, earlier: NaiveDate) -> i64 {
    (later - earlier).num_days()
}

/// Start of the trailing window for `period`, or `None` when unbounded
pub fn period_start(period: Period, now: NaiveDateTime) -> Option<NaiveDateTime> {
    match period {
        Period::Week => Some(now - Duration::days(7)),
        Period::Month => Some(
            now.checked_sub_months(Months::new(1))
                .unwrap_or(NaiveDateTime::MIN),
        ),
        Period::Year => Some(
            now.checked_sub_months(Months::new(12))
                .unwrap_or(NaiveDateTime::MIN),
        ),
        Period::All => None,
    }
}

/// First day of the month containing `day`
pub fn month_start(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Number of days in the month containing `day`
pub fn days_in_month(day: NaiveDate) -> u32 {
    let first = month_start(day);
    first
        .checked_add_months(Months::new(1))
        .map(|next| (next - first).num_days() as u32)
        .unwrap_or(31)
}

/// Current local wall-clock time
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}
