//! Multi-day study plan progression.
//!
//! A generated plan is a fixed ladder of days; exactly one day is `Current`
//! at a time and days unlock strictly in order. Completion of a day is
//! gated by the quiz (minimum answered questions) before the app calls
//! `complete_day`.

use serde::{Deserialize, Serialize};

use crate::content::PlanDayOutline;

/// Minimum answered questions in a day's quiz before the day may complete.
pub const MIN_ANSWERS_PER_DAY: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    Locked,
    Current,
    Completed,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlanDay {
    pub day: u32,
    pub topic: String,
    pub focus: String,
    pub activities: Vec<String>,
    pub status: DayStatus,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudyPlan {
    pub topic: String,
    pub days: Vec<PlanDay>,
}

impl StudyPlan {
    /// Attach progression state to a freshly generated outline: day 1
    /// starts `Current`, everything after it `Locked`.
    pub fn new(topic: &str, outline: Vec<PlanDayOutline>) -> Self {
        let days = outline
            .into_iter()
            .enumerate()
            .map(|(i, day)| PlanDay {
                day: day.day,
                topic: day.topic,
                focus: day.focus,
                activities: day.activities,
                status: if i == 0 {
                    DayStatus::Current
                } else {
                    DayStatus::Locked
                },
            })
            .collect();
        Self {
            topic: topic.to_string(),
            days,
        }
    }

    pub fn day(&self, index: usize) -> Option<&PlanDay> {
        self.days.get(index)
    }

    /// Locked days reject start requests; current and completed (review)
    /// days may be started.
    pub fn can_start(&self, index: usize) -> bool {
        matches!(
            self.days.get(index).map(|d| d.status),
            Some(DayStatus::Current) | Some(DayStatus::Completed)
        )
    }

    /// Mark day `index` completed and promote the following day, if any, to
    /// `Current`. Only the current day can complete; everything else is a
    /// no-op. Returns whether anything changed.
    pub fn complete_day(&mut self, index: usize) -> bool {
        match self.days.get(index) {
            Some(day) if day.status == DayStatus::Current => {}
            _ => return false,
        }
        self.days[index].status = DayStatus::Completed;
        if let Some(next) = self.days.get_mut(index + 1) {
            next.status = DayStatus::Current;
        }
        true
    }

    pub fn current_index(&self) -> Option<usize> {
        self.days.iter().position(|d| d.status == DayStatus::Current)
    }

    pub fn completed_count(&self) -> usize {
        self.days
            .iter()
            .filter(|d| d.status == DayStatus::Completed)
            .count()
    }

    pub fn is_finished(&self) -> bool {
        !self.days.is_empty() && self.days.iter().all(|d| d.status == DayStatus::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(n: u32) -> Vec<PlanDayOutline> {
        (1..=n)
            .map(|day| PlanDayOutline {
                day,
                topic: format!("topic {day}"),
                focus: format!("focus {day}"),
                activities: vec!["read".to_string(), "quiz".to_string()],
            })
            .collect()
    }

    #[test]
    fn new_plan_has_day_one_current_and_rest_locked() {
        let plan = StudyPlan::new("rust", outline(5));
        assert_eq!(plan.days[0].status, DayStatus::Current);
        assert!(
            plan.days[1..]
                .iter()
                .all(|d| d.status == DayStatus::Locked)
        );
    }

    #[test]
    fn completing_a_day_promotes_the_next() {
        let mut plan = StudyPlan::new("rust", outline(5));
        assert!(plan.complete_day(0));
        assert_eq!(plan.days[0].status, DayStatus::Completed);
        assert_eq!(plan.days[1].status, DayStatus::Current);
        // Days beyond the promoted one are untouched.
        assert_eq!(plan.days[2].status, DayStatus::Locked);
    }

    #[test]
    fn at_most_one_current_day_through_full_progression() {
        let mut plan = StudyPlan::new("rust", outline(5));
        for i in 0..5 {
            let current = plan
                .days
                .iter()
                .filter(|d| d.status == DayStatus::Current)
                .count();
            assert_eq!(current, 1, "before completing day {i}");
            assert!(plan.complete_day(i));
        }
        assert!(plan.is_finished());
        assert_eq!(plan.current_index(), None);
    }

    #[test]
    fn locked_day_rejects_start_and_completion() {
        let mut plan = StudyPlan::new("rust", outline(5));
        assert!(!plan.can_start(2));
        assert!(!plan.complete_day(2));
        assert_eq!(plan.days[2].status, DayStatus::Locked);
    }

    #[test]
    fn completed_day_stays_startable_for_review() {
        let mut plan = StudyPlan::new("rust", outline(5));
        plan.complete_day(0);
        assert!(plan.can_start(0));
        // But completing it again must not re-promote anything.
        assert!(!plan.complete_day(0));
        assert_eq!(plan.days[1].status, DayStatus::Current);
    }

    #[test]
    fn completing_the_last_day_promotes_nothing() {
        let mut plan = StudyPlan::new("rust", outline(2));
        plan.complete_day(0);
        assert!(plan.complete_day(1));
        assert!(plan.is_finished());
        assert_eq!(plan.completed_count(), 2);
    }
}
