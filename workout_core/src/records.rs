//! Personal records drawn from the completed-session history.

use crate::analytics::one_rep_max_epley;
use crate::{CompletedSession, WorkoutSet};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Best weighted set logged for one exercise
#[derive(Clone, Debug, PartialEq)]
pub struct PersonalRecord {
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    pub estimated_one_rep_max: f64,
    pub achieved_at: DateTime<Utc>,
}

impl PersonalRecord {
    fn from_set(exercise: &str, set: &WorkoutSet, weight: f64) -> Self {
        Self {
            exercise: exercise.to_string(),
            weight,
            reps: set.reps,
            estimated_one_rep_max: one_rep_max_epley(weight, set.reps),
            achieved_at: set.completed_at,
        }
    }

    /// Higher estimated 1RM wins; ties go to the earlier set
    fn beats(&self, other: &PersonalRecord) -> bool {
        match self.estimated_one_rep_max.total_cmp(&other.estimated_one_rep_max) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => self.achieved_at < other.achieved_at,
        }
    }
}

/// Best set per exercise name, ranked by estimated one-rep max
///
/// Bodyweight sets (no weight) never count. Results are ordered by exercise
/// name.
pub fn personal_records(sessions: &[CompletedSession]) -> Vec<PersonalRecord> {
    let mut best: BTreeMap<&str, PersonalRecord> = BTreeMap::new();

    for exercise in sessions.iter().flat_map(|s| s.exercises.iter()) {
        for set in &exercise.sets {
            let Some(weight) = set.weight.filter(|w| *w > 0.0) else {
                continue;
            };

            let candidate = PersonalRecord::from_set(&exercise.name, set, weight);
            match best.get(exercise.name.as_str()) {
                Some(current) if !candidate.beats(current) => {}
                _ => {
                    best.insert(exercise.name.as_str(), candidate);
                }
            }
        }
    }

    tracing::debug!("Found personal records for {} exercises", best.len());
    best.into_values().collect()
}

/// Records set during `session` that beat everything in `previous`
pub fn new_records(previous: &[CompletedSession], session: &CompletedSession) -> Vec<PersonalRecord> {
    let before = personal_records(previous);

    personal_records(std::slice::from_ref(session))
        .into_iter()
        .filter(|record| {
            before
                .iter()
                .find(|b| b.exercise == record.exercise)
                .map_or(true, |b| {
                    record.estimated_one_rep_max > b.estimated_one_rep_max
                })
        })
        .collect()
}
