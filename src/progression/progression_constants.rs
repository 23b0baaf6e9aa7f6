use lazy_static::lazy_static;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

/// Difficulty labels
///
/// Each constant names one of the supported small-goal difficulty levels.
/// The multiplier scales the experience a small goal is worth.
pub const DIFFICULTY_VERY_EASY: &str = "very-easy";

pub const DIFFICULTY_EASY: &str = "easy";

pub const DIFFICULTY_NORMAL: &str = "normal";

pub const DIFFICULTY_HARD: &str = "hard";

pub const DIFFICULTY_VERY_HARD: &str = "very-hard";

/// All recognized difficulty labels
pub const DIFFICULTIES: [&str; 5] = [
    DIFFICULTY_VERY_EASY,
    DIFFICULTY_EASY,
    DIFFICULTY_NORMAL,
    DIFFICULTY_HARD,
    DIFFICULTY_VERY_HARD,
];

/// Multiplier applied when the difficulty label is not recognized
pub const DEFAULT_DIFFICULTY_MULTIPLIER: Decimal = Decimal::ONE;

lazy_static! {
    /// Single difficulty -> multiplier policy for the whole engine
    pub static ref DIFFICULTY_MULTIPLIERS: HashMap<&'static str, Decimal> = {
        let mut multipliers = HashMap::new();
        multipliers.insert(DIFFICULTY_VERY_EASY, dec!(0.5));
        multipliers.insert(DIFFICULTY_EASY, dec!(0.7));
        multipliers.insert(DIFFICULTY_NORMAL, dec!(1.0));
        multipliers.insert(DIFFICULTY_HARD, dec!(1.2));
        multipliers.insert(DIFFICULTY_VERY_HARD, dec!(1.5));
        multipliers
    };
}

/// Looks up the multiplier for a difficulty label.
///
/// Unrecognized labels fall back to the neutral multiplier instead of
/// failing; callers never see an error from this lookup.
pub fn multiplier_for(difficulty: &str) -> Decimal {
    DIFFICULTY_MULTIPLIERS
        .get(difficulty)
        .copied()
        .unwrap_or(DEFAULT_DIFFICULTY_MULTIPLIER)
}

/// Experience granted for a single task completed on its own
pub const TASK_EXPERIENCE: i64 = 1;

/// Multiplier applied to the summed small-goal experience when the whole
/// goal is completed
pub const GOAL_COMPLETION_BONUS: i64 = 3;

/// Upper bound of the precomputed rank table; experience beyond the last
/// threshold maps to this rank
pub const MAX_RANK: i32 = 100;

/// A roulette ticket is granted each time the rank decade (rank / 10)
/// increases
pub const RANKS_PER_TICKET: i32 = 10;
