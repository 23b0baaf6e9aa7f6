use lazy_static::lazy_static;
use rust_decimal::Decimal;

use super::progression_constants::{MAX_RANK, RANKS_PER_TICKET};

lazy_static! {
    /// Cumulative experience thresholds, indexed by rank.
    /// THRESHOLDS[r] is the experience at which rank r is left behind.
    static ref THRESHOLDS: Vec<i64> = build_thresholds(MAX_RANK);
}

/// Builds the cumulative experience threshold table.
///
/// `T[0] = 0`, `T[1] = 5`; from rank 2 on, each threshold adds an
/// increment that starts at 10 and grows by 5 once per block of five
/// ranks (10,10,10,10,10,15,15,...).
pub fn build_thresholds(max_rank: i32) -> Vec<i64> {
    let mut thresholds = Vec::with_capacity(max_rank as usize + 1);
    thresholds.push(0);
    if max_rank >= 1 {
        thresholds.push(5);
    }

    let mut increment = 5i64;
    for rank in 2..=max_rank {
        if (rank - 2) % 5 == 0 {
            increment += 5;
        }
        let previous = thresholds[rank as usize - 1];
        thresholds.push(previous + increment);
    }

    thresholds
}

/// Maps cumulative experience to a rank.
///
/// Returns the smallest rank `r` with `total_exp < T[r]`. Ranks are
/// 1-based; any experience below the first threshold is rank 1, and
/// experience beyond the table saturates at `MAX_RANK`. Pure: no side
/// effects, safe to call repeatedly and concurrently.
pub fn calculate_rank(total_exp: Decimal) -> i32 {
    for (rank, threshold) in THRESHOLDS.iter().enumerate().skip(1) {
        if total_exp < Decimal::from(*threshold) {
            return rank as i32;
        }
    }
    MAX_RANK
}

/// The rank decade: crossing a decade boundary is what grants tickets.
pub fn rank_decade(rank: i32) -> i32 {
    rank / RANKS_PER_TICKET
}
