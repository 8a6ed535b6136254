//! Habit domain model.
//!
//! # Responsibility
//! - Define the canonical habit record persisted in the habit list blob.
//! - Own the validation rules shared by creation and load paths.
//!
//! # Invariants
//! - `id` is non-empty and never reused for another habit.
//! - `name` is trimmed and never empty.
//! - `completions` holds each calendar date at most once.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for a habit.
///
/// New ids are time-ordered UUIDv7 strings. Loaded ids are trimmed but
/// otherwise kept as-is, so older timestamp-style ids stay addressable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitId(String);

impl HabitId {
    /// Generates a fresh id.
    ///
    /// UUIDv7 carries a millisecond timestamp plus random bits, so two ids
    /// minted within the same millisecond still differ.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wraps an externally supplied id after trimming.
    ///
    /// # Errors
    /// - Returns `ValidationError::EmptyId` when the trimmed value is empty.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for HabitId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HabitId {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl AsRef<str> for HabitId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Validation failure for habit invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is empty or whitespace only.
    EmptyName,
    /// Id is empty or whitespace only.
    EmptyId,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "habit name cannot be empty"),
            Self::EmptyId => write!(f, "habit id cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// A recurring activity tracked for daily completion.
///
/// Serialized with camelCase keys (`id`, `name`, `createdAt`, `completions`)
/// to stay compatible with existing stored blobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "HabitRecord")]
pub struct Habit {
    pub id: HabitId,
    /// Trimmed display label. There is no rename operation.
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Distinct completion dates, serialized in ascending order.
    pub completions: BTreeSet<NaiveDate>,
}

impl Habit {
    /// Creates a habit with a generated id and no completions.
    ///
    /// # Errors
    /// - Returns `ValidationError::EmptyName` when `name` trims to nothing.
    pub fn new(name: &str, created_at: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::with_id(HabitId::generate(), name, created_at)
    }

    /// Creates a habit with a caller-provided id.
    ///
    /// Used by import paths where identity already exists.
    pub fn with_id(
        id: HabitId,
        name: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let habit = Self {
            id,
            name: name.trim().to_string(),
            created_at,
            completions: BTreeSet::new(),
        };
        habit.validate()?;
        Ok(habit)
    }

    /// Checks id and name invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        Ok(())
    }

    /// Records a completion on `date`.
    ///
    /// Returns `false` when the date was already recorded.
    pub fn complete_on(&mut self, date: NaiveDate) -> bool {
        self.completions.insert(date)
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completions.contains(&date)
    }

    pub fn total_completions(&self) -> usize {
        self.completions.len()
    }
}

/// Wire shape accepted on load, validated into `Habit`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HabitRecord {
    id: String,
    name: String,
    created_at: DateTime<Utc>,
    #[serde(default)]
    completions: BTreeSet<NaiveDate>,
}

impl TryFrom<HabitRecord> for Habit {
    type Error = ValidationError;

    fn try_from(record: HabitRecord) -> Result<Self, Self::Error> {
        let habit = Self {
            id: HabitId::parse(&record.id)?,
            name: record.name,
            created_at: record.created_at,
            completions: record.completions,
        };
        habit.validate()?;
        Ok(habit)
    }
}

#[cfg(test)]
mod tests {
    use super::{Habit, HabitId, ValidationError};
    use chrono::{NaiveDate, TimeZone, Utc};

    #[test]
    fn new_trims_name() {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let habit = Habit::new("  Read  ", created_at).unwrap();
        assert_eq!(habit.name, "Read");
        assert!(habit.completions.is_empty());
    }

    #[test]
    fn parse_rejects_blank_id() {
        assert_eq!(HabitId::parse("  ").unwrap_err(), ValidationError::EmptyId);
        assert_eq!(HabitId::parse(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn complete_on_reports_duplicates() {
        let created_at = Utc.with_ymd_and_hms(2024, 6, 10, 8, 0, 0).unwrap();
        let mut habit = Habit::new("Walk", created_at).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();

        assert!(habit.complete_on(day));
        assert!(!habit.complete_on(day));
        assert_eq!(habit.total_completions(), 1);
    }
}
