//! Core domain types for the workout session engine.
//!
//! This module defines the fundamental types used throughout the system:
//! - Exercise templates from the static catalog
//! - Logged sets and the exercises that own them
//! - The active session snapshot and its wire format
//! - Recommendation inputs and completed-session summaries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Catalog Types
// ============================================================================

/// Difficulty tier of an exercise template
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// An exercise definition from the static catalog (e.g., "Bench Press")
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseTemplate {
    pub id: String,
    pub name: String,
    pub primary_muscles: Vec<String>,
    #[serde(default)]
    pub secondary_muscles: Vec<String>,
    pub equipment: Vec<String>,
    #[serde(default)]
    pub default_rep_min: Option<u32>,
    #[serde(default)]
    pub default_rep_max: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movement_pattern: Option<String>,
}

/// The ordered, immutable exercise catalog
///
/// Iteration order is significant: it is the tie-break order for
/// recommendations.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: Vec<ExerciseTemplate>,
}

// ============================================================================
// Session Types
// ============================================================================

/// A single logged set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSet {
    pub set_number: u32,
    pub reps: u32,
    #[serde(default)]
    pub weight: Option<f64>,
    /// Reps in reserve (0-10)
    #[serde(default)]
    pub rir: Option<u8>,
    pub completed_at: DateTime<Utc>,
}

/// An exercise within a session, owning its sets in performed order
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutExercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sort_order: u32,
    #[serde(default)]
    pub sets: Vec<WorkoutSet>,
}

impl WorkoutExercise {
    /// Create an exercise with no sets logged yet
    pub fn new(id: impl Into<String>, name: impl Into<String>, sort_order: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sort_order,
            sets: Vec::new(),
        }
    }

    /// The set number the next logged set should carry (1-based)
    pub fn next_set_number(&self) -> u32 {
        self.sets.last().map(|s| s.set_number + 1).unwrap_or(1)
    }
}

/// A closed pause interval within a session
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PausePeriod {
    pub paused_at: DateTime<Utc>,
    pub resumed_at: DateTime<Utc>,
}

/// The in-progress workout
///
/// This is the unit of persistence. `paused_at` is present iff the session is
/// paused; the wire format additionally carries a derived `isPaused` flag.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(from = "SessionSnapshot", into = "SessionSnapshot")]
pub struct ActiveSession {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub paused_at: Option<DateTime<Utc>>,
    pub current_exercise_id: Option<String>,
    pub exercises: Vec<WorkoutExercise>,
    /// Closed pause intervals, only populated under pause-excluding accounting
    pub pause_periods: Vec<PausePeriod>,
}

impl ActiveSession {
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Look up an exercise in this session by id
    pub fn exercise(&self, exercise_id: &str) -> Option<&WorkoutExercise> {
        self.exercises.iter().find(|e| e.id == exercise_id)
    }

    /// The most recently completed set across all exercises
    pub fn last_set(&self) -> Option<&WorkoutSet> {
        self.exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .max_by_key(|s| s.completed_at)
    }
}

/// Persisted snapshot layout, shared with the host app's key-value storage
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    session_id: String,
    started_at: DateTime<Utc>,
    #[serde(default)]
    current_exercise_id: Option<String>,
    #[serde(default)]
    exercises: Vec<WorkoutExercise>,
    #[serde(default)]
    is_paused: bool,
    #[serde(default)]
    paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pause_periods: Vec<PausePeriod>,
}

impl From<SessionSnapshot> for ActiveSession {
    fn from(snapshot: SessionSnapshot) -> Self {
        if snapshot.is_paused != snapshot.paused_at.is_some() {
            tracing::debug!(
                "Snapshot {} has isPaused={} but pausedAt={:?}; trusting pausedAt",
                snapshot.session_id,
                snapshot.is_paused,
                snapshot.paused_at
            );
        }

        ActiveSession {
            session_id: snapshot.session_id,
            started_at: snapshot.started_at,
            paused_at: snapshot.paused_at,
            current_exercise_id: snapshot.current_exercise_id,
            exercises: snapshot.exercises,
            pause_periods: snapshot.pause_periods,
        }
    }
}

impl From<ActiveSession> for SessionSnapshot {
    fn from(session: ActiveSession) -> Self {
        SessionSnapshot {
            is_paused: session.is_paused(),
            session_id: session.session_id,
            started_at: session.started_at,
            current_exercise_id: session.current_exercise_id,
            exercises: session.exercises,
            paused_at: session.paused_at,
            pause_periods: session.pause_periods,
        }
    }
}

// ============================================================================
// Recommendation Types
// ============================================================================

/// Inputs for ranking exercise candidates for a training day
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationContext {
    /// Muscle groups targeted for the day
    pub day_tags: Vec<String>,
    /// Equipment the user has available
    pub equipment: Vec<String>,
    /// Names of exercises already chosen for the day
    pub existing_exercises: Vec<String>,
    /// Recent training volume per muscle group; absent entries count as 0
    #[serde(default)]
    pub recent_volume: HashMap<String, f64>,
}

impl RecommendationContext {
    pub fn volume_for(&self, muscle: &str) -> f64 {
        self.recent_volume.get(muscle).copied().unwrap_or(0.0)
    }
}

// ============================================================================
// History Types
// ============================================================================

/// Summary of a finished session, appended to the history log
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompletedSession {
    pub id: Uuid,
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_duration_sec: u64,
    pub total_sets: u32,
    pub total_reps: u32,
    pub total_volume: f64,
    pub strength_score: f64,
    pub average_reserve: f64,
    pub exercises: Vec<WorkoutExercise>,
}
