//! Streak calculation over completion dates.
//!
//! # Responsibility
//! - Count consecutive completed days ending today or yesterday.
//! - Derive per-habit stats for callers that render progress.
//!
//! # Invariants
//! - Date arithmetic happens on `NaiveDate` only; no timestamp subtraction.
//! - Only the most recent run counts. Older runs behind a gap earn nothing.
//! - Completion order and duplicates in the input never change the result.

use crate::model::habit::Habit;
use chrono::{Days, Local, NaiveDate};
use serde::Serialize;
use std::collections::BTreeSet;

/// Derived progress numbers for one habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitStats {
    pub streak: u32,
    pub total_completions: usize,
    pub completed_today: bool,
}

/// Computes the current streak as of `today`.
///
/// The streak is anchored at `today` when it is completed, otherwise at
/// yesterday. A most recent completion older than yesterday means the streak
/// is broken. Dates after `today` are ignored.
pub fn calculate_streak<'a, I>(completions: I, today: NaiveDate) -> u32
where
    I: IntoIterator<Item = &'a NaiveDate>,
{
    let distinct: BTreeSet<NaiveDate> = completions
        .into_iter()
        .copied()
        .filter(|date| *date <= today)
        .collect();

    let Some(most_recent) = distinct.last().copied() else {
        return 0;
    };

    let gap = today.signed_duration_since(most_recent).num_days();
    if gap > 1 {
        return 0;
    }

    let mut streak = 0;
    let mut expected = most_recent;
    for date in distinct.iter().rev() {
        if *date != expected {
            break;
        }
        streak += 1;
        match expected.checked_sub_days(Days::new(1)) {
            Some(previous) => expected = previous,
            None => break,
        }
    }

    streak
}

/// Computes the current streak as of the local calendar date.
pub fn calculate_streak_today<'a, I>(completions: I) -> u32
where
    I: IntoIterator<Item = &'a NaiveDate>,
{
    calculate_streak(completions, Local::now().date_naive())
}

/// Returns whether `habit` has a completion on `today`.
pub fn is_completed_on(habit: &Habit, today: NaiveDate) -> bool {
    habit.is_completed_on(today)
}

/// Derives streak, total count and today's status for one habit.
pub fn habit_stats(habit: &Habit, today: NaiveDate) -> HabitStats {
    HabitStats {
        streak: calculate_streak(&habit.completions, today),
        total_completions: habit.total_completions(),
        completed_today: is_completed_on(habit, today),
    }
}

#[cfg(test)]
mod tests {
    use super::calculate_streak;
    use chrono::NaiveDate;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn streak_of(dates: &[&str]) -> u32 {
        let completions: Vec<NaiveDate> = dates.iter().map(|value| day(value)).collect();
        calculate_streak(&completions, day("2024-06-10"))
    }

    #[test]
    fn empty_completions_have_no_streak() {
        assert_eq!(streak_of(&[]), 0);
    }

    #[test]
    fn today_only_counts_one() {
        assert_eq!(streak_of(&["2024-06-10"]), 1);
    }

    #[test]
    fn three_consecutive_days_ending_today() {
        assert_eq!(streak_of(&["2024-06-10", "2024-06-09", "2024-06-08"]), 3);
    }

    #[test]
    fn gap_of_two_days_breaks_streak() {
        assert_eq!(streak_of(&["2024-06-08"]), 0);
    }

    #[test]
    fn yesterday_anchors_streak_when_today_missing() {
        assert_eq!(streak_of(&["2024-06-09", "2024-06-07"]), 1);
        assert_eq!(streak_of(&["2024-06-09", "2024-06-08", "2024-06-07"]), 3);
    }

    #[test]
    fn missing_yesterday_stops_count_after_today() {
        assert_eq!(streak_of(&["2024-06-10", "2024-06-08"]), 1);
    }

    #[test]
    fn input_order_and_duplicates_do_not_matter() {
        assert_eq!(
            streak_of(&["2024-06-08", "2024-06-10", "2024-06-09", "2024-06-10"]),
            3
        );
    }

    #[test]
    fn future_dates_are_ignored() {
        assert_eq!(streak_of(&["2024-06-12", "2024-06-10"]), 1);
        assert_eq!(streak_of(&["2024-06-11"]), 0);
    }

    #[test]
    fn streak_crosses_month_and_leap_day() {
        let completions = [day("2024-03-01"), day("2024-02-29"), day("2024-02-28")];
        assert_eq!(calculate_streak(&completions, day("2024-03-01")), 3);
    }
}
