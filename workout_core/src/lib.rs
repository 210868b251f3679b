#![forbid(unsafe_code)]

//! Core domain model and business logic for the FitTrack workout engine.
//!
//! This crate provides:
//! - Domain types (exercise templates, sets, sessions, snapshots)
//! - Session clock and the active-session state machine
//! - Snapshot persistence over an opaque key-value store
//! - Exercise recommendations and strength/volume analytics
//! - Completed-session history and personal records

pub mod types;
pub mod error;
pub mod clock;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod store;
pub mod session;
pub mod persist;
pub mod analytics;
pub mod recommend;
pub mod validation;
pub mod history;
pub mod records;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_catalog, get_default_catalog};
pub use config::Config;
pub use session::{AppLifecycle, PauseAccounting, SessionState, TimerReading, WorkoutSession};
pub use persist::PersistentSession;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use history::{JsonlSink, SessionSink};
pub use recommend::recommend;
