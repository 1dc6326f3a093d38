use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const SCHEMA_VERSION: u32 = 1;

/// Persisted profile: the daily check-in streak plus bookkeeping. Read once
/// at startup, written whenever a check-in changes it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub schema_version: u32,
    pub streak_days: u32,
    pub best_streak: u32,
    /// "%Y-%m-%d" of the last check-in.
    pub last_check_in: Option<String>,
}

impl Default for ProfileData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            streak_days: 0,
            best_streak: 0,
            last_check_in: None,
        }
    }
}

impl ProfileData {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Register a check-in on `today`. Consecutive days extend the streak,
    /// a gap resets it to 1, a repeat within the same day changes nothing.
    /// Returns whether the profile changed and so needs saving.
    pub fn check_in(&mut self, today: NaiveDate) -> bool {
        let today_str = today.format("%Y-%m-%d").to_string();
        if self.last_check_in.as_deref() == Some(&today_str) {
            return false;
        }
        let consecutive = self
            .last_check_in
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            .is_some_and(|last| (today - last).num_days() == 1);
        self.streak_days = if consecutive { self.streak_days + 1 } else { 1 };
        self.best_streak = self.best_streak.max(self.streak_days);
        self.last_check_in = Some(today_str);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn first_check_in_starts_streak_at_one() {
        let mut profile = ProfileData::default();
        assert!(profile.check_in(date("2026-08-01")));
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.best_streak, 1);
    }

    #[test]
    fn consecutive_days_extend_the_streak() {
        let mut profile = ProfileData::default();
        profile.check_in(date("2026-08-01"));
        profile.check_in(date("2026-08-02"));
        profile.check_in(date("2026-08-03"));
        assert_eq!(profile.streak_days, 3);
    }

    #[test]
    fn same_day_check_in_is_idempotent() {
        let mut profile = ProfileData::default();
        profile.check_in(date("2026-08-01"));
        assert!(!profile.check_in(date("2026-08-01")));
        assert_eq!(profile.streak_days, 1);
    }

    #[test]
    fn a_gap_resets_but_keeps_best() {
        let mut profile = ProfileData::default();
        profile.check_in(date("2026-08-01"));
        profile.check_in(date("2026-08-02"));
        profile.check_in(date("2026-08-10"));
        assert_eq!(profile.streak_days, 1);
        assert_eq!(profile.best_streak, 2);
    }

    #[test]
    fn month_boundary_counts_as_consecutive() {
        let mut profile = ProfileData::default();
        profile.check_in(date("2026-08-31"));
        profile.check_in(date("2026-09-01"));
        assert_eq!(profile.streak_days, 2);
    }
}
