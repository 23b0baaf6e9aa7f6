use log::debug;
use rust_decimal::prelude::*;
use rust_decimal::{Decimal, RoundingStrategy};

use super::progression_constants::{multiplier_for, GOAL_COMPLETION_BONUS, TASK_EXPERIENCE};

/// Experience for one task completed on its own.
pub fn task_experience() -> Decimal {
    Decimal::from(TASK_EXPERIENCE)
}

/// Experience for a small goal: task count scaled by the difficulty
/// multiplier, rounded to one decimal place (half-up).
pub fn small_goal_experience(task_count: usize, difficulty: &str) -> Decimal {
    let multiplier = multiplier_for(difficulty);
    let exp = (Decimal::from(task_count as u64) * multiplier)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    debug!(
        "Small goal experience: {} tasks x {} ({}) = {}",
        task_count, multiplier, difficulty, exp
    );
    exp
}

/// Experience for a whole goal: the already-frozen small-goal experience
/// values summed, tripled, and rounded to an integer (half-up) at this
/// final step only.
pub fn goal_experience<I>(small_goal_exps: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    let total: Decimal = small_goal_exps.into_iter().sum();
    (total * Decimal::from(GOAL_COMPLETION_BONUS))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts an experience value read from its SQLite double column.
/// Rounded to two places to shed float noise; real values carry at most
/// one decimal place.
pub fn exp_from_db(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default().round_dp(2)
}

/// Converts an experience value for storage in a double column.
pub fn exp_to_db(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::progression_constants::{DIFFICULTY_HARD, DIFFICULTY_VERY_EASY};
    use rust_decimal_macros::dec;

    #[test]
    fn task_experience_is_one() {
        assert_eq!(task_experience(), dec!(1));
    }

    #[test]
    fn small_goal_experience_scales_task_count_by_multiplier() {
        assert_eq!(small_goal_experience(3, DIFFICULTY_HARD), dec!(3.6));
        assert_eq!(small_goal_experience(1, DIFFICULTY_VERY_EASY), dec!(0.5));
        assert_eq!(small_goal_experience(4, "normal"), dec!(4.0));
    }

    #[test]
    fn small_goal_experience_defaults_unknown_difficulty_to_task_count() {
        assert_eq!(small_goal_experience(7, "heroic"), dec!(7.0));
    }

    #[test]
    fn goal_experience_triples_the_frozen_sum_then_rounds() {
        // 3 hard tasks -> 3.6; 3.6 * 3 = 10.8 -> 11
        assert_eq!(goal_experience(vec![dec!(3.6)]), dec!(11));
        assert_eq!(goal_experience(vec![dec!(3.6), dec!(2.0)]), dec!(17));
        assert_eq!(goal_experience(Vec::new()), dec!(0));
    }

    #[test]
    fn goal_experience_rounds_half_up_at_the_boundary() {
        // 3.5 * 3 = 10.5 rounds away from zero, not to even
        assert_eq!(goal_experience(vec![dec!(3.5)]), dec!(11));
    }

    #[test]
    fn db_round_trip_preserves_one_decimal_values() {
        let exp = dec!(3.6);
        assert_eq!(exp_from_db(exp_to_db(exp)), exp);
    }
}
