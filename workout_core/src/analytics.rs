//! Strength and volume analytics over logged sets.
//!
//! All functions are pure. Sets with no weight count as bodyweight work and
//! contribute reps but no volume.

use crate::{ActiveSession, CompletedSession, WorkoutSet};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Default smoothing window for strength-score trends
pub const DEFAULT_EMA_PERIOD: usize = 7;

/// Sum of weight × reps
pub fn total_volume(sets: &[WorkoutSet]) -> f64 {
    sets.iter()
        .map(|s| s.weight.unwrap_or(0.0) * f64::from(s.reps))
        .sum()
}

pub fn total_reps(sets: &[WorkoutSet]) -> u32 {
    sets.iter().map(|s| s.reps).sum()
}

/// Volume-based strength score for a workout
///
/// Currently the same quantity as [`total_volume`]; kept separate because the
/// product reports it on its own axis.
pub fn strength_score(sets: &[WorkoutSet]) -> f64 {
    total_volume(sets)
}

/// Mean reps-in-reserve over the sets that recorded one, or 0
pub fn average_reserve(sets: &[WorkoutSet]) -> f64 {
    let (sum, count) = sets
        .iter()
        .filter_map(|s| s.rir)
        .fold((0u32, 0u32), |(sum, count), rir| (sum + u32::from(rir), count + 1));

    if count == 0 {
        0.0
    } else {
        f64::from(sum) / f64::from(count)
    }
}

/// Epley one-rep-max estimate: `weight × (1 + reps / 30)`
pub fn one_rep_max_epley(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    weight * (1.0 + f64::from(reps) / 30.0)
}

/// Brzycki one-rep-max estimate: `weight × 36 / (37 - reps)`
///
/// The formula diverges at 37 reps, so anything from 37 up is capped at
/// twice the working weight.
pub fn one_rep_max_brzycki(weight: f64, reps: u32) -> f64 {
    if reps == 1 {
        return weight;
    }
    if reps >= 37 {
        return weight * 2.0;
    }
    weight * (36.0 / (37.0 - f64::from(reps)))
}

/// Highest Epley estimate among weighted sets
pub fn best_one_rep_max(sets: &[WorkoutSet]) -> Option<f64> {
    sets.iter()
        .filter_map(|s| s.weight.map(|w| one_rep_max_epley(w, s.reps)))
        .fold(None, |best, e| match best {
            Some(b) if b >= e => Some(b),
            _ => Some(e),
        })
}

/// Exponential moving average with `alpha = 2 / (period + 1)`
pub fn ema(values: &[f64], period: usize) -> Vec<f64> {
    let Some((&first, rest)) = values.split_first() else {
        return Vec::new();
    };

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(values.len());
    out.push(first);

    for &value in rest {
        let prev = out[out.len() - 1];
        out.push(alpha * value + (1.0 - alpha) * prev);
    }

    out
}

/// All sets of a session in exercise order
pub fn session_sets(session: &ActiveSession) -> Vec<WorkoutSet> {
    session
        .exercises
        .iter()
        .flat_map(|e| e.sets.iter().cloned())
        .collect()
}

/// Build the history record for a session ending at `ended_at`
pub fn summarize(
    session: &ActiveSession,
    elapsed: std::time::Duration,
    ended_at: DateTime<Utc>,
) -> CompletedSession {
    let sets = session_sets(session);

    CompletedSession {
        id: Uuid::new_v4(),
        session_id: session.session_id.clone(),
        started_at: session.started_at,
        ended_at,
        total_duration_sec: elapsed.as_secs(),
        total_sets: sets.len() as u32,
        total_reps: total_reps(&sets),
        total_volume: total_volume(&sets),
        strength_score: strength_score(&sets),
        average_reserve: average_reserve(&sets),
        exercises: session.exercises.clone(),
    }
}
