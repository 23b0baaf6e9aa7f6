use diesel::sqlite::SqliteConnection;
use log::{debug, error};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::users::UserRepositoryTrait;

use super::progression_errors::ProgressionError;
use super::progression_model::{ExperiencePosting, TicketAward, TicketSpend};
use super::rank_table::{calculate_rank, rank_decade};

/// The per-user progression ledger: cumulative experience, the rank it
/// maps to, and roulette tickets granted on rank-decade crossings.
///
/// Callers hand every mutation a connection that is already inside an
/// exclusive (BEGIN IMMEDIATE) transaction, so reads and the narrow
/// progression write are serialized per user. `spend_ticket` opens its
/// own transaction because it is not part of a completion cascade.
pub struct ProgressionService<U: UserRepositoryTrait> {
    pool: Arc<DbPool>,
    user_repo: Arc<U>,
}

impl<U: UserRepositoryTrait> ProgressionService<U> {
    pub fn new(pool: Arc<DbPool>, user_repo: Arc<U>) -> Self {
        Self { pool, user_repo }
    }

    /// Adds experience to the user's running total. Negative amounts are a
    /// programming-contract violation, not a user error.
    pub fn add_experience(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        amount: Decimal,
    ) -> Result<Decimal> {
        if amount < Decimal::ZERO {
            error!(
                "Rejected negative experience amount {} for user {}",
                amount, user_id
            );
            return Err(ProgressionError::InvariantViolation(format!(
                "experience amount must be non-negative, got {}",
                amount
            ))
            .into());
        }

        let progression = self.user_repo.get_progression(conn, user_id)?;
        let new_total = progression.total_exp + amount;
        self.user_repo.update_progression(
            conn,
            user_id,
            new_total,
            progression.last_roulette_rank,
            progression.tickets,
        )?;

        debug!(
            "Added {} exp for user {}: {} -> {}",
            amount, user_id, progression.total_exp, new_total
        );
        Ok(new_total)
    }

    /// Recomputes the rank from a running total. Pure; nothing is persisted.
    pub fn recompute_rank(&self, total_exp: Decimal) -> i32 {
        calculate_rank(total_exp)
    }

    /// Grants one ticket per rank decade crossed since tickets were last
    /// granted. Calling this again without an intervening experience
    /// change is a no-op.
    pub fn award_tickets_if_crossed_decade(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<TicketAward> {
        let progression = self.user_repo.get_progression(conn, user_id)?;
        let new_rank = calculate_rank(progression.total_exp);
        let decades_crossed = rank_decade(new_rank) - rank_decade(progression.last_roulette_rank);

        if decades_crossed <= 0 {
            return Ok(TicketAward {
                rank: new_rank,
                tickets_awarded: 0,
                tickets: progression.tickets,
            });
        }

        let tickets = progression.tickets + decades_crossed;
        self.user_repo
            .update_progression(conn, user_id, progression.total_exp, new_rank, tickets)?;

        debug!(
            "Awarded {} ticket(s) to user {}: rank {} -> {}",
            decades_crossed, user_id, progression.last_roulette_rank, new_rank
        );
        Ok(TicketAward {
            rank: new_rank,
            tickets_awarded: decades_crossed,
            tickets,
        })
    }

    /// Posts experience and reconciles tickets in one lock scope. Every
    /// completion cascade goes through here so rank can never advance
    /// without its tickets being settled.
    pub fn post_experience(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        amount: Decimal,
    ) -> Result<ExperiencePosting> {
        let total_exp = self.add_experience(conn, user_id, amount)?;
        let award = self.award_tickets_if_crossed_decade(conn, user_id)?;
        Ok(ExperiencePosting {
            total_exp,
            rank: award.rank,
            tickets_awarded: award.tickets_awarded,
            tickets: award.tickets,
        })
    }

    /// Consumes one ticket. An empty balance is a normal outcome, reported
    /// as `InsufficientTickets`.
    pub fn spend_ticket(&self, user_id: &str) -> Result<TicketSpend> {
        let mut conn = get_connection(&self.pool)?;
        conn.immediate_transaction(|conn| {
            let progression = self.user_repo.get_progression(conn, user_id)?;
            if progression.tickets <= 0 {
                return Err(ProgressionError::InsufficientTickets.into());
            }

            let remaining = progression.tickets - 1;
            self.user_repo.update_progression(
                conn,
                user_id,
                progression.total_exp,
                progression.last_roulette_rank,
                remaining,
            )?;

            Ok(TicketSpend {
                tickets_remaining: remaining,
            })
        })
    }
}
