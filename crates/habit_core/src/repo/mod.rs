//! Repository layer over the persistence adapter.
//!
//! # Responsibility
//! - Expose use-case level habit operations to rendering callers.
//! - Keep serialization and storage-key details out of callers.
//!
//! # Invariants
//! - Validation and not-found conditions are returned as `HabitError`.
//! - Storage failures never escape as errors; they surface as `LoadSource`
//!   and `Saved::persisted`.

pub mod habit_repo;
