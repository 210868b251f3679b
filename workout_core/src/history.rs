//! Completed-session history log.
//!
//! Finished sessions are appended to a JSONL (JSON Lines) file with file
//! locking. The log feeds the recent-volume map used by the recommender and
//! the strength-score trend.

use crate::analytics;
use crate::{Catalog, CompletedSession, Result};
use chrono::{DateTime, Duration, Utc};
use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Session sink trait for persisting completed sessions
pub trait SessionSink {
    fn append(&mut self, session: &CompletedSession) -> Result<()>;
}

/// JSONL-based session sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionSink for JsonlSink {
    fn append(&mut self, session: &CompletedSession) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(session)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended session {} to history", session.session_id);
        Ok(())
    }
}

/// Read every completed session from a history log
///
/// Malformed lines are skipped with a warning.
pub fn read_completed_sessions(path: &Path) -> Result<Vec<CompletedSession>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut sessions = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<CompletedSession>(&line) {
            Ok(session) => sessions.push(session),
            Err(e) => {
                tracing::warn!("Failed to parse session at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} sessions from history", sessions.len());
    Ok(sessions)
}

/// Sessions that ended within the last `days` days, newest first
///
/// A window reaching past the representable date range covers all history.
pub fn load_recent_sessions(path: &Path, days: i64) -> Result<Vec<CompletedSession>> {
    let cutoff = window_start(Utc::now(), days);

    let mut sessions: Vec<_> = read_completed_sessions(path)?
        .into_iter()
        .filter(|s| s.ended_at >= cutoff)
        .collect();
    sessions.sort_by(|a, b| b.ended_at.cmp(&a.ended_at));

    tracing::info!(
        "Loaded {} sessions from last {} days",
        sessions.len(),
        days
    );
    Ok(sessions)
}

/// Start of a `days`-long window ending at `now`, clamped to the earliest date
fn window_start(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Training volume per primary muscle group across `sessions`
///
/// Exercises are matched to catalog templates by name; exercises the catalog
/// does not know contribute nothing.
pub fn recent_volume_by_muscle(
    sessions: &[CompletedSession],
    catalog: &Catalog,
) -> HashMap<String, f64> {
    let mut volume: HashMap<String, f64> = HashMap::new();

    for exercise in sessions.iter().flat_map(|s| s.exercises.iter()) {
        let Some(template) = catalog.find_by_name(&exercise.name) else {
            tracing::debug!("No catalog entry for '{}', skipping volume", exercise.name);
            continue;
        };

        let exercise_volume = analytics::total_volume(&exercise.sets);
        for muscle in &template.primary_muscles {
            *volume.entry(muscle.clone()).or_insert(0.0) += exercise_volume;
        }
    }

    volume
}

/// Smoothed strength scores, oldest session first
pub fn strength_trend(sessions: &[CompletedSession], period: usize) -> Vec<f64> {
    let mut ordered: Vec<&CompletedSession> = sessions.iter().collect();
    ordered.sort_by_key(|s| s.ended_at);

    let scores: Vec<f64> = ordered.iter().map(|s| s.strength_score).collect();
    analytics::ema(&scores, period)
}
