//! Domain model for tracked habits.
//!
//! # Responsibility
//! - Define the canonical habit record and its identifier.
//!
//! # Invariants
//! - Every habit is identified by a stable `HabitId`.
//! - Deletion is a hard removal from the list; there are no tombstones.

pub mod habit;
