//! Difficulty adjustment heuristic.
//!
//! Not a calibrated ability model: a bounded integer estimate in [0,100]
//! nudged after every answer. The boost shrinks as the level rises and the
//! penalty grows with it, so the estimate descends faster than it climbs
//! near the top.

pub const BASELINE_LEVEL: u8 = 50;

/// Map (current level, correctness) to the next level. Pure; the quiz
/// session calls this exactly once per answered question.
pub fn next_level(current: u8, correct: bool) -> u8 {
    let level = current.min(100) as f64;
    if correct {
        let boost = (10.0 * (1.0 - level / 110.0)).round().max(2.0);
        (level + boost).min(100.0) as u8
    } else {
        let penalty = (8.0 * level / 100.0).round().max(3.0);
        (level - penalty).max(0.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stays_in_range_for_all_levels() {
        for level in 0..=100u8 {
            assert!(next_level(level, true) <= 100);
            assert!(next_level(level, false) <= 100);
        }
    }

    #[test]
    fn correct_answers_never_stall_below_cap() {
        for level in 0..100u8 {
            assert!(next_level(level, true) > level, "stalled at {level}");
        }
        assert_eq!(next_level(100, true), 100);
    }

    #[test]
    fn incorrect_answers_strictly_descend_above_floor() {
        for level in 1..=100u8 {
            assert!(next_level(level, false) < level, "no descent at {level}");
        }
        assert_eq!(next_level(0, false), 0);
    }

    #[test]
    fn worked_values_from_baseline() {
        // boost = round(10 * (1 - 50/110)) = round(5.45) = 5
        assert_eq!(next_level(50, true), 55);
        // penalty = max(3, round(8 * 55/100)) = max(3, 4) = 4
        assert_eq!(next_level(55, false), 51);
    }

    #[test]
    fn boost_floor_applies_near_cap() {
        // Raw boost at 95 rounds to 1; the floor of 2 takes over.
        assert_eq!(next_level(95, true), 97);
        assert_eq!(next_level(99, true), 100);
    }

    #[test]
    fn penalty_floor_applies_near_zero() {
        // Raw penalty at low levels rounds below 3; floor clamps the rest.
        assert_eq!(next_level(2, false), 0);
        assert_eq!(next_level(10, false), 7);
    }

    #[test]
    fn descent_outpaces_ascent_at_high_levels() {
        for level in 60..100u8 {
            let up = next_level(level, true) - level;
            let down = level - next_level(level, false);
            assert!(down >= up, "asymmetry inverted at {level}");
        }
    }
}
