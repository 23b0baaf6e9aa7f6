use std::sync::Arc;

use crate::db::DbPool;
use crate::errors::Result;
use crate::goals::goals_repository::GoalRepository;
use crate::progression::calculate_rank;

use super::users_model::{NewUser, User, UserSummary};
use super::users_repository::UserRepository;
use super::users_traits::UserRepositoryTrait;

/// Number of recently completed small goals shown on the profile
const LATEST_COMPLETED_LIMIT: i64 = 10;

/// Service for managing users
pub struct UserService {
    user_repo: UserRepository,
    goal_repo: GoalRepository,
}

impl UserService {
    /// Creates a new UserService instance
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self {
            user_repo: UserRepository::new(pool.clone()),
            goal_repo: GoalRepository::new(pool),
        }
    }

    pub fn create_user(&self, new_user: NewUser) -> Result<User> {
        self.user_repo.create(new_user)
    }

    pub fn get_user(&self, user_id: &str) -> Result<User> {
        self.user_repo.get_by_id(user_id)
    }

    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        self.user_repo.delete(user_id)?;
        Ok(())
    }

    /// Profile payload: the ledger, the derived rank, and the freshest
    /// completions (last 24 hours, falling back to all-time).
    pub fn get_summary(&self, user_id: &str) -> Result<UserSummary> {
        let user = self.user_repo.get_by_id(user_id)?;
        let latest_completed = self
            .goal_repo
            .latest_completed_small_goals(user_id, LATEST_COMPLETED_LIMIT)?;

        Ok(UserSummary {
            rank: calculate_rank(user.total_exp),
            id: user.id,
            name: user.name,
            email: user.email,
            total_exp: user.total_exp,
            last_roulette_rank: user.last_roulette_rank,
            tickets: user.tickets,
            latest_completed_small_goals: latest_completed,
        })
    }
}
