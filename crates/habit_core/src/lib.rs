//! Habit store and streak engine.
//! This crate owns habit invariants, completion tracking and streak math;
//! rendering callers only invoke its operations and display the results.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod store;
pub mod streak;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingConfig, LoggingError};
pub use model::habit::{Habit, HabitId, ValidationError};
pub use repo::habit_repo::{
    HabitError, HabitRepository, HabitResult, LoadReport, LoadSource, Saved, DEFAULT_STORAGE_KEY,
};
pub use store::{FileStore, KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult};
pub use streak::{calculate_streak, calculate_streak_today, habit_stats, is_completed_on, HabitStats};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
