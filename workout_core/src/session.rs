//! Active workout session state machine.
//!
//! `WorkoutSession` owns at most one `ActiveSession` and exposes the lifecycle
//! transitions (start, pause, resume, end) plus the in-session edits (log a
//! set, move the current-exercise pointer, replace the exercise list).
//!
//! Every mutating call is a no-op when no session is active; UI races such as
//! a double-tapped pause button resolve silently. The state machine does no
//! I/O: see [`crate::persist`] for the snapshot boundary.

use crate::clock::{self, Clock, SystemClock};
use crate::{ActiveSession, PausePeriod, WorkoutExercise, WorkoutSet};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How paused time is treated once a session is resumed
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PauseAccounting {
    /// Closed pause intervals are recorded and excluded from elapsed time.
    #[default]
    ExcludePauses,
    /// Only the current pause freezes the timer; after resuming, elapsed time
    /// is plain wall-clock time since the start (pauses are forgotten).
    WallClock,
}

/// Observable lifecycle state of the session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Running,
    Paused,
}

/// Host application lifecycle, delivered by the host on transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppLifecycle {
    Active,
    Inactive,
    Background,
}

/// One timer read, as displayed by the host on each tick
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimerReading {
    pub elapsed: Duration,
    pub formatted: String,
    pub is_running: bool,
}

/// State container for the single active workout
#[derive(Debug)]
pub struct WorkoutSession<C: Clock = SystemClock> {
    active: Option<ActiveSession>,
    keep_awake: bool,
    accounting: PauseAccounting,
    lifecycle: AppLifecycle,
    clock: C,
}

impl WorkoutSession<SystemClock> {
    pub fn new(accounting: PauseAccounting) -> Self {
        Self::with_clock(SystemClock, accounting)
    }
}

impl Default for WorkoutSession<SystemClock> {
    fn default() -> Self {
        Self::new(PauseAccounting::default())
    }
}

impl<C: Clock> WorkoutSession<C> {
    pub fn with_clock(clock: C, accounting: PauseAccounting) -> Self {
        Self {
            active: None,
            keep_awake: false,
            accounting,
            lifecycle: AppLifecycle::Active,
            clock,
        }
    }

    /// Install a previously persisted snapshot verbatim
    ///
    /// No staleness check is made: a session started days ago is still
    /// considered running. The keep-awake flag is transient and is not restored.
    pub fn restore(&mut self, snapshot: Option<ActiveSession>) {
        if let Some(ref s) = snapshot {
            tracing::debug!(
                "Restored session {} (started {}, paused: {})",
                s.session_id,
                s.started_at,
                s.is_paused()
            );
        }
        self.active = snapshot;
    }

    pub fn state(&self) -> SessionState {
        match &self.active {
            None => SessionState::NoSession,
            Some(s) if s.is_paused() => SessionState::Paused,
            Some(_) => SessionState::Running,
        }
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.active.as_ref()
    }

    pub fn accounting(&self) -> PauseAccounting {
        self.accounting
    }

    /// Whether the host should hold a wake lock right now
    pub fn should_keep_awake(&self) -> bool {
        self.keep_awake && self.state() == SessionState::Running
    }

    /// Start a new session, replacing any session already in progress
    pub fn start(&mut self, session_id: impl Into<String>, exercises: Vec<WorkoutExercise>) {
        let session_id = session_id.into();
        if let Some(previous) = &self.active {
            tracing::warn!(
                "Starting session {} over existing session {}",
                session_id,
                previous.session_id
            );
        }

        let current_exercise_id = exercises.first().map(|e| e.id.clone());
        let now = self.clock.now();

        tracing::info!(
            "Started session {} with {} exercises",
            session_id,
            exercises.len()
        );

        self.active = Some(ActiveSession {
            session_id,
            started_at: now,
            paused_at: None,
            current_exercise_id,
            exercises,
            pause_periods: Vec::new(),
        });
        self.keep_awake = true;
    }

    /// Pause the timer; pausing again moves the pause instant to now
    pub fn pause(&mut self) -> bool {
        let now = self.clock.now();
        let Some(session) = self.active.as_mut() else {
            tracing::debug!("pause() ignored: no active session");
            return false;
        };

        if let Some(previous) = session.paused_at {
            tracing::debug!("Session already paused at {}; refreshing", previous);
        }
        session.paused_at = Some(now);
        true
    }

    /// Resume a paused session
    pub fn resume(&mut self) -> bool {
        let now = self.clock.now();
        let accounting = self.accounting;
        let Some(session) = self.active.as_mut() else {
            tracing::debug!("resume() ignored: no active session");
            return false;
        };

        let Some(paused_at) = session.paused_at.take() else {
            tracing::debug!("resume() ignored: session {} is running", session.session_id);
            return false;
        };

        if accounting == PauseAccounting::ExcludePauses {
            session.pause_periods.push(PausePeriod {
                paused_at,
                resumed_at: now.max(paused_at),
            });
        }
        true
    }

    /// Append a set to the named exercise; unknown ids are ignored
    pub fn add_set(&mut self, exercise_id: &str, set: WorkoutSet) -> bool {
        let Some(session) = self.active.as_mut() else {
            tracing::debug!("add_set() ignored: no active session");
            return false;
        };

        match session.exercises.iter_mut().find(|e| e.id == exercise_id) {
            Some(exercise) => {
                tracing::debug!(
                    "Logged set {} for {}: {} reps",
                    set.set_number,
                    exercise.name,
                    set.reps
                );
                exercise.sets.push(set);
                true
            }
            None => {
                tracing::debug!("add_set() ignored: unknown exercise {}", exercise_id);
                false
            }
        }
    }

    /// Point the session at an exercise (or at none); not validated
    pub fn set_current_exercise(&mut self, exercise_id: Option<String>) -> bool {
        match self.active.as_mut() {
            Some(session) => {
                session.current_exercise_id = exercise_id;
                true
            }
            None => false,
        }
    }

    /// Replace the planned exercise list wholesale
    pub fn update_exercises(&mut self, exercises: Vec<WorkoutExercise>) -> bool {
        match self.active.as_mut() {
            Some(session) => {
                session.exercises = exercises;
                true
            }
            None => false,
        }
    }

    /// End the session regardless of state, handing back what was recorded
    pub fn end(&mut self) -> Option<ActiveSession> {
        self.keep_awake = false;
        let ended = self.active.take();
        if let Some(ref s) = ended {
            tracing::info!("Ended session {}", s.session_id);
        }
        ended
    }

    /// Elapsed training time, recomputed from the session timestamps
    pub fn elapsed(&self) -> Duration {
        match &self.active {
            None => Duration::ZERO,
            Some(session) => session_elapsed(session, self.accounting, self.clock.now()),
        }
    }

    /// Periodic timer read; `None` without a session
    pub fn tick(&self) -> Option<TimerReading> {
        self.active.as_ref().map(|session| {
            let elapsed = session_elapsed(session, self.accounting, self.clock.now());
            TimerReading {
                formatted: clock::format_duration(elapsed),
                elapsed,
                is_running: !session.is_paused(),
            }
        })
    }

    /// Handle an app lifecycle transition reported by the host
    ///
    /// Coming back to the foreground with a running session yields a freshly
    /// recomputed reading; no counter is carried across the suspension.
    pub fn on_lifecycle_change(&mut self, next: AppLifecycle) -> Option<TimerReading> {
        let previous = std::mem::replace(&mut self.lifecycle, next);
        let became_active = previous != AppLifecycle::Active && next == AppLifecycle::Active;

        if became_active && self.state() == SessionState::Running {
            let reading = self.tick();
            if let Some(ref r) = reading {
                tracing::debug!("Foregrounded; recomputed elapsed {}", r.formatted);
            }
            return reading;
        }
        None
    }
}

/// Elapsed time of a session under the given accounting policy
pub fn session_elapsed(
    session: &ActiveSession,
    accounting: PauseAccounting,
    now: chrono::DateTime<chrono::Utc>,
) -> Duration {
    match accounting {
        PauseAccounting::WallClock => clock::elapsed_at(session.started_at, session.paused_at, now),
        PauseAccounting::ExcludePauses => {
            let end = session.paused_at.unwrap_or(now);
            clock::elapsed_across_pauses_at(session.started_at, &session.pause_periods, end)
        }
    }
}
