use rand::Rng;
use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;
use crate::progression::ProgressionService;
use crate::users::UserRepository;

use super::roulette_constants::ROULETTE_SLOT_COUNT;
use super::roulette_model::{RouletteText, RouletteTextUpdate, SpinResult};
use super::roulette_repository::RouletteRepository;

/// Service for the roulette wheel tickets are spent on
pub struct RouletteService {
    roulette_repo: RouletteRepository,
    progression: ProgressionService<UserRepository>,
}

impl RouletteService {
    /// Creates a new RouletteService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            roulette_repo: RouletteRepository::new(pool.clone()),
            progression: ProgressionService::new(pool.clone(), Arc::new(UserRepository::new(pool))),
        }
    }

    pub fn get_roulette_texts(&self, user_id: &str) -> Result<Vec<RouletteText>> {
        self.roulette_repo.list_for_user(user_id)
    }

    pub fn get_roulette_text(&self, user_id: &str, number: i32) -> Result<RouletteText> {
        self.roulette_repo.get_by_number(user_id, number)
    }

    pub fn update_roulette_text(
        &self,
        user_id: &str,
        update: RouletteTextUpdate,
    ) -> Result<RouletteText> {
        self.roulette_repo.update_text(user_id, update)
    }

    /// Spends one ticket and lands on a random slot. With no tickets left
    /// the spend fails first and the wheel never moves.
    pub fn spin(&self, user_id: &str) -> Result<SpinResult> {
        let spend = self.progression.spend_ticket(user_id)?;
        let number = rand::thread_rng().gen_range(1..=ROULETTE_SLOT_COUNT);
        let slot = self.roulette_repo.get_by_number(user_id, number)?;
        Ok(SpinResult {
            slot,
            tickets_remaining: spend.tickets_remaining,
        })
    }
}
