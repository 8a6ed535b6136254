//! Habit repository over a key-value persistence adapter.
//!
//! # Responsibility
//! - Provide add/complete/delete/load/save/stats over the full habit list.
//! - Turn persistence failures into data-level signals instead of errors.
//!
//! # Invariants
//! - Every operation reloads the list from the store; nothing is cached.
//! - Every mutation rewrites the whole list under one storage key.
//! - Validation and not-found failures leave the stored list untouched.
//! - A corrupt blob is copied to `<key>.corrupt` before it is overwritten.
//! - An unreadable store is read-only: mutations never write over it.
//! - Habit names never appear in log events.

use crate::clock::{Clock, SystemClock};
use crate::model::habit::{Habit, HabitId, ValidationError};
use crate::store::KeyValueStore;
use crate::streak::{habit_stats, HabitStats};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized habit list.
pub const DEFAULT_STORAGE_KEY: &str = "habitTracker_habits";

const QUARANTINE_SUFFIX: &str = ".corrupt";

pub type HabitResult<T> = Result<T, HabitError>;

/// Caller-facing failure of a repository operation.
#[derive(Debug)]
pub enum HabitError {
    Validation(ValidationError),
    NotFound(HabitId),
}

impl Display for HabitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "habit not found: {id}"),
        }
    }
}

impl Error for HabitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
        }
    }
}

impl From<ValidationError> for HabitError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Operation result paired with the outcome of the final write.
///
/// `persisted` is `false` when the store rejected the write or when the
/// write was skipped because the store could not be read. It is `true` when
/// the write succeeded or when no write was needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved<T> {
    pub value: T,
    pub persisted: bool,
}

/// Where the habits returned by a load came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// Parsed from a stored blob.
    Stored,
    /// Nothing stored yet.
    Absent,
    /// A blob exists but could not be parsed or violates invariants.
    Corrupt,
    /// The store could not be read.
    Unavailable,
}

/// Habits plus the provenance of the load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub habits: Vec<Habit>,
    pub source: LoadSource,
}

struct Snapshot {
    habits: Vec<Habit>,
    source: LoadSource,
    corrupt_blob: Option<String>,
}

/// Habit CRUD over an injected store and clock.
pub struct HabitRepository<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    key: String,
}

impl<S: KeyValueStore> HabitRepository<S, SystemClock> {
    /// Creates a repository using the local system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> HabitRepository<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }

    /// Overrides the storage key, e.g. to keep several profiles in one store.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Loads the habit list in insertion order.
    ///
    /// Absent, corrupt and unreadable storage all yield an empty list.
    pub fn load(&self) -> Vec<Habit> {
        self.load_report().habits
    }

    /// Loads the habit list and reports why it may be empty.
    pub fn load_report(&self) -> LoadReport {
        self.snapshot().0
    }

    /// Serializes and writes the full list.
    ///
    /// Returns `false` when the write failed; the failure is logged only.
    pub fn save(&mut self, habits: &[Habit]) -> bool {
        let payload = match serde_json::to_string(habits) {
            Ok(payload) => payload,
            Err(err) => {
                error!(
                    "event=habits_save module=repo status=error error_code=serialize_failed error={err}"
                );
                return false;
            }
        };

        match self.store.set(&self.key, &payload) {
            Ok(()) => {
                debug!(
                    "event=habits_save module=repo status=ok count={} bytes={}",
                    habits.len(),
                    payload.len()
                );
                true
            }
            Err(err) => {
                error!(
                    "event=habits_save module=repo status=error error_code=store_write_failed count={} error={err}",
                    habits.len()
                );
                false
            }
        }
    }

    /// Creates a habit from `name` and appends it to the list.
    ///
    /// # Errors
    /// - `HabitError::Validation` when `name` is empty after trimming.
    pub fn add(&mut self, name: &str) -> HabitResult<Saved<Habit>> {
        let mut habit = Habit::new(name, self.clock.now()).map_err(|err| {
            warn!("event=habit_add module=repo status=rejected error_code=validation error={err}");
            err
        })?;

        let Snapshot {
            mut habits,
            source,
            corrupt_blob,
        } = self.read_for_write();
        while habits.iter().any(|existing| existing.id == habit.id) {
            habit.id = HabitId::generate();
        }
        habits.push(habit.clone());

        let persisted = self.commit(&habits, source, corrupt_blob);
        info!(
            "event=habit_add module=repo status=ok habit_id={} count={} persisted={persisted}",
            habit.id,
            habits.len()
        );
        Ok(Saved {
            value: habit,
            persisted,
        })
    }

    /// Marks the habit completed for today's local date.
    ///
    /// Repeating the call on the same day changes nothing.
    ///
    /// # Errors
    /// - `HabitError::NotFound` when no habit has `id`.
    pub fn complete(&mut self, id: &HabitId) -> HabitResult<Saved<Habit>> {
        let today = self.clock.today();
        let Snapshot {
            mut habits,
            source,
            corrupt_blob,
        } = self.read_for_write();

        let Some(habit) = habits.iter_mut().find(|habit| &habit.id == id) else {
            warn!("event=habit_complete module=repo status=rejected error_code=not_found habit_id={id}");
            return Err(HabitError::NotFound(id.clone()));
        };

        if !habit.complete_on(today) {
            debug!("event=habit_complete module=repo status=noop habit_id={id} date={today}");
            return Ok(Saved {
                value: habit.clone(),
                persisted: true,
            });
        }
        let updated = habit.clone();

        let persisted = self.commit(&habits, source, corrupt_blob);
        info!("event=habit_complete module=repo status=ok habit_id={id} date={today} persisted={persisted}");
        Ok(Saved {
            value: updated,
            persisted,
        })
    }

    /// Removes the habit with `id`, if any, and rewrites the list.
    ///
    /// `value` reports whether a habit was removed. An unknown id is not an
    /// error.
    pub fn delete(&mut self, id: &HabitId) -> Saved<bool> {
        let Snapshot {
            mut habits,
            source,
            corrupt_blob,
        } = self.read_for_write();
        let before = habits.len();
        habits.retain(|habit| &habit.id != id);
        let removed = habits.len() != before;

        let persisted = self.commit(&habits, source, corrupt_blob);
        info!("event=habit_delete module=repo status=ok habit_id={id} removed={removed} persisted={persisted}");
        Saved {
            value: removed,
            persisted,
        }
    }

    /// Looks up one habit by id from freshly loaded state.
    pub fn find(&self, id: &HabitId) -> Option<Habit> {
        self.load().into_iter().find(|habit| &habit.id == id)
    }

    /// Derives streak and completion counters as of the clock's today.
    pub fn stats(&self, habit: &Habit) -> HabitStats {
        habit_stats(habit, self.clock.today())
    }

    pub fn is_completed_today(&self, habit: &Habit) -> bool {
        habit.is_completed_on(self.clock.today())
    }

    fn read_for_write(&self) -> Snapshot {
        let (report, corrupt_blob) = self.snapshot();
        Snapshot {
            habits: report.habits,
            source: report.source,
            corrupt_blob,
        }
    }

    fn snapshot(&self) -> (LoadReport, Option<String>) {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => {
                debug!("event=habits_load module=repo status=ok source=absent count=0");
                return (Self::empty(LoadSource::Absent), None);
            }
            Err(err) => {
                warn!(
                    "event=habits_load module=repo status=degraded source=unavailable error={err}"
                );
                return (Self::empty(LoadSource::Unavailable), None);
            }
        };

        match parse_habits(&raw) {
            Ok(habits) => {
                debug!(
                    "event=habits_load module=repo status=ok source=stored count={}",
                    habits.len()
                );
                (
                    LoadReport {
                        habits,
                        source: LoadSource::Stored,
                    },
                    None,
                )
            }
            Err(reason) => {
                warn!(
                    "event=habits_load module=repo status=degraded source=corrupt bytes={} error={reason}",
                    raw.len()
                );
                (Self::empty(LoadSource::Corrupt), Some(raw))
            }
        }
    }

    fn commit(
        &mut self,
        habits: &[Habit],
        source: LoadSource,
        corrupt_blob: Option<String>,
    ) -> bool {
        if source == LoadSource::Unavailable {
            warn!(
                "event=habits_save module=repo status=skipped error_code=store_read_failed count={}",
                habits.len()
            );
            return false;
        }
        if let Some(blob) = corrupt_blob {
            let quarantine_key = format!("{}{QUARANTINE_SUFFIX}", self.key);
            match self.store.set(&quarantine_key, &blob) {
                Ok(()) => warn!(
                    "event=habits_quarantine module=repo status=ok key={quarantine_key} bytes={}",
                    blob.len()
                ),
                Err(err) => error!(
                    "event=habits_quarantine module=repo status=error key={quarantine_key} error={err}"
                ),
            }
        }
        self.save(habits)
    }

    fn empty(source: LoadSource) -> LoadReport {
        LoadReport {
            habits: Vec::new(),
            source,
        }
    }
}

fn parse_habits(raw: &str) -> Result<Vec<Habit>, String> {
    let habits: Vec<Habit> = serde_json::from_str(raw).map_err(|err| err.to_string())?;

    let mut seen = HashSet::with_capacity(habits.len());
    for habit in &habits {
        if !seen.insert(habit.id.as_str()) {
            return Err(format!("duplicate habit id `{}`", habit.id));
        }
    }

    Ok(habits)
}

#[cfg(test)]
mod tests {
    use super::parse_habits;

    #[test]
    fn parse_rejects_duplicate_ids() {
        let raw = r#"[
            {"id":"1","name":"a","createdAt":"2024-06-01T00:00:00Z","completions":[]},
            {"id":"1","name":"b","createdAt":"2024-06-01T00:00:00Z","completions":[]}
        ]"#;
        let err = parse_habits(raw).unwrap_err();
        assert!(err.contains("duplicate habit id"));
    }

    #[test]
    fn parse_rejects_blank_names() {
        let raw = r#"[{"id":"1","name":"  ","createdAt":"2024-06-01T00:00:00Z"}]"#;
        let err = parse_habits(raw).unwrap_err();
        assert!(err.contains("name cannot be empty"), "unexpected error: {err}");
    }

    #[test]
    fn parse_accepts_missing_completions() {
        let raw = r#"[{"id":"1","name":"Stretch","createdAt":"2024-06-01T07:30:00.000Z"}]"#;
        let habits = parse_habits(raw).unwrap();
        assert_eq!(habits.len(), 1);
        assert!(habits[0].completions.is_empty());
    }
}
