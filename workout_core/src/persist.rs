//! Snapshot persistence boundary around the session state machine.
//!
//! `PersistentSession` loads the last snapshot when it is opened and writes
//! the snapshot back after every mutating call. Storage failures never reach
//! the caller: a failed or corrupt read starts with no session, and a failed
//! write is logged and the in-memory state carries on.

use crate::clock::{Clock, SystemClock};
use crate::session::{AppLifecycle, PauseAccounting, SessionState, TimerReading, WorkoutSession};
use crate::store::KeyValueStore;
use crate::{ActiveSession, Result, WorkoutExercise, WorkoutSet};

/// Fixed key under which the active session snapshot is stored
pub const SNAPSHOT_KEY: &str = "workout-storage";

/// Read the persisted snapshot, treating any failure as "no session"
pub fn load_snapshot<S: KeyValueStore>(store: &S) -> Option<ActiveSession> {
    let raw = match store.get(SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::info!("No session snapshot found, starting fresh");
            return None;
        }
        Err(e) => {
            tracing::warn!("Unable to read session snapshot: {}. Starting fresh.", e);
            return None;
        }
    };

    match serde_json::from_str::<Option<ActiveSession>>(&raw) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Failed to parse session snapshot: {}. Starting fresh.", e);
            None
        }
    }
}

/// Replace the persisted snapshot; `None` clears it
pub fn save_snapshot<S: KeyValueStore>(store: &mut S, snapshot: Option<&ActiveSession>) -> Result<()> {
    match snapshot {
        Some(session) => {
            let contents = serde_json::to_string(session)?;
            store.set(SNAPSHOT_KEY, &contents)
        }
        None => store.remove(SNAPSHOT_KEY),
    }
}

/// A `WorkoutSession` bound to a key-value store
pub struct PersistentSession<S: KeyValueStore, C: Clock = SystemClock> {
    inner: WorkoutSession<C>,
    store: S,
}

impl<S: KeyValueStore> PersistentSession<S, SystemClock> {
    pub fn open(store: S, accounting: PauseAccounting) -> Self {
        Self::open_with_clock(store, SystemClock, accounting)
    }
}

impl<S: KeyValueStore, C: Clock> PersistentSession<S, C> {
    pub fn open_with_clock(store: S, clock: C, accounting: PauseAccounting) -> Self {
        let mut inner = WorkoutSession::with_clock(clock, accounting);
        inner.restore(load_snapshot(&store));
        Self { inner, store }
    }

    /// Read-only view of the wrapped state machine
    pub fn session(&self) -> &WorkoutSession<C> {
        &self.inner
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.inner.state()
    }

    pub fn active(&self) -> Option<&ActiveSession> {
        self.inner.active()
    }

    pub fn tick(&self) -> Option<TimerReading> {
        self.inner.tick()
    }

    fn persist(&mut self) {
        if let Err(e) = save_snapshot(&mut self.store, self.inner.active()) {
            tracing::warn!("Failed to persist session snapshot: {}", e);
        }
    }

    pub fn start(&mut self, session_id: impl Into<String>, exercises: Vec<WorkoutExercise>) {
        self.inner.start(session_id, exercises);
        self.persist();
    }

    pub fn pause(&mut self) -> bool {
        let changed = self.inner.pause();
        self.persist();
        changed
    }

    pub fn resume(&mut self) -> bool {
        let changed = self.inner.resume();
        self.persist();
        changed
    }

    pub fn add_set(&mut self, exercise_id: &str, set: WorkoutSet) -> bool {
        let changed = self.inner.add_set(exercise_id, set);
        self.persist();
        changed
    }

    pub fn set_current_exercise(&mut self, exercise_id: Option<String>) -> bool {
        let changed = self.inner.set_current_exercise(exercise_id);
        self.persist();
        changed
    }

    pub fn update_exercises(&mut self, exercises: Vec<WorkoutExercise>) -> bool {
        let changed = self.inner.update_exercises(exercises);
        self.persist();
        changed
    }

    pub fn end(&mut self) -> Option<ActiveSession> {
        let ended = self.inner.end();
        self.persist();
        ended
    }

    pub fn on_lifecycle_change(&mut self, next: AppLifecycle) -> Option<TimerReading> {
        self.inner.on_lifecycle_change(next)
    }
}
