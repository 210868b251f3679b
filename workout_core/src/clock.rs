//! Session clock: elapsed-time arithmetic, formatting and rest thresholds.
//!
//! Elapsed time is always recomputed from absolute timestamps rather than
//! accumulated from ticks, so a process that is suspended or killed and later
//! resumed reports the correct value on its first read.

use crate::PausePeriod;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Source of "now" for the session state machine
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Convert a signed chrono span into a non-negative std duration
fn clamp_non_negative(span: chrono::Duration) -> Duration {
    span.to_std().unwrap_or(Duration::ZERO)
}

/// Elapsed time of a session relative to `now`
///
/// When `paused_at` is present the result is frozen at `paused_at - started_at`.
/// Clock skew that would make the result negative yields zero.
pub fn elapsed_at(
    started_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Duration {
    let end = paused_at.unwrap_or(now);
    clamp_non_negative(end - started_at)
}

/// Elapsed time of a session using the system clock
pub fn elapsed(started_at: DateTime<Utc>, paused_at: Option<DateTime<Utc>>) -> Duration {
    elapsed_at(started_at, paused_at, Utc::now())
}

/// Total time spent inside closed pause intervals
pub fn total_paused(pause_periods: &[PausePeriod]) -> chrono::Duration {
    pause_periods
        .iter()
        .fold(chrono::Duration::zero(), |total, period| {
            total + (period.resumed_at - period.paused_at)
        })
}

/// Elapsed time excluding every closed pause interval, relative to `now`
pub fn elapsed_across_pauses_at(
    started_at: DateTime<Utc>,
    pause_periods: &[PausePeriod],
    now: DateTime<Utc>,
) -> Duration {
    clamp_non_negative((now - started_at) - total_paused(pause_periods))
}

/// Elapsed time excluding every closed pause interval, using the system clock
pub fn elapsed_across_pauses(started_at: DateTime<Utc>, pause_periods: &[PausePeriod]) -> Duration {
    elapsed_across_pauses_at(started_at, pause_periods, Utc::now())
}

fn split_hms(duration: Duration) -> (u64, u64, u64) {
    let total_seconds = duration.as_secs();
    (
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60,
    )
}

/// Format as `MM:SS`, or `H:MM:SS` once an hour has passed
pub fn format_duration(duration: Duration) -> String {
    let (hours, minutes, seconds) = split_hms(duration);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Format as a short human string, e.g. `1h 23m`, `4m 5s` or `0s`
///
/// Zero-valued units are omitted and seconds are dropped once hours are shown.
pub fn format_duration_human(duration: Duration) -> String {
    let (hours, minutes, seconds) = split_hms(duration);

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    if seconds > 0 && hours == 0 {
        parts.push(format!("{}s", seconds));
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Heavy strength work: low reps close to failure
const HEAVY_REST_SECONDS: u32 = 180;
/// Hypertrophy range
const MODERATE_REST_SECONDS: u32 = 90;
/// Endurance / pump work
const LIGHT_REST_SECONDS: u32 = 60;

/// Recommended rest before the next set, in seconds
pub fn recommended_rest_seconds(reps: u32, rir: Option<u8>) -> u32 {
    if reps <= 5 && rir.map_or(true, |r| r <= 1) {
        return HEAVY_REST_SECONDS;
    }

    if reps <= 12 {
        return MODERATE_REST_SECONDS;
    }

    LIGHT_REST_SECONDS
}

/// Time since the last set was completed, relative to `now`
pub fn rest_elapsed_at(last_set_completed_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    clamp_non_negative(now - last_set_completed_at)
}

/// Time since the last set was completed, using the system clock
pub fn rest_elapsed(last_set_completed_at: DateTime<Utc>) -> Duration {
    rest_elapsed_at(last_set_completed_at, Utc::now())
}

/// Whether the rest target has been reached, relative to `now`
pub fn has_reached_rest_target_at(
    last_set_completed_at: DateTime<Utc>,
    target_rest_seconds: u32,
    now: DateTime<Utc>,
) -> bool {
    rest_elapsed_at(last_set_completed_at, now) >= Duration::from_secs(target_rest_seconds.into())
}

/// Whether the rest target has been reached, using the system clock
pub fn has_reached_rest_target(last_set_completed_at: DateTime<Utc>, target_rest_seconds: u32) -> bool {
    has_reached_rest_target_at(last_set_completed_at, target_rest_seconds, Utc::now())
}

/// Manually advanced clock for deterministic tests
#[cfg(test)]
#[derive(Debug)]
pub struct ManualClock {
    now: std::cell::Cell<DateTime<Utc>>,
}

#[cfg(test)]
impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: std::cell::Cell::new(start),
        }
    }

    pub fn advance_secs(&self, secs: i64) {
        self.now.set(self.now.get() + chrono::Duration::seconds(secs));
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

#[cfg(test)]
impl Clock for &ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}
