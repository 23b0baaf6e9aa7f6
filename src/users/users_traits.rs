use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::users::users_model::{NewUser, ProgressionSnapshot, User};

/// Trait for user repository operations.
///
/// `get_progression` and `update_progression` take a connection because
/// they only make sense inside the caller's exclusive transaction; the
/// pair is the read-modify-write the per-user lock serializes.
pub trait UserRepositoryTrait: Send + Sync {
    fn create(&self, new_user: NewUser) -> Result<User>;
    fn get_by_id(&self, user_id: &str) -> Result<User>;
    fn get_progression(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<ProgressionSnapshot>;
    fn update_progression(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        total_exp: Decimal,
        last_roulette_rank: i32,
        tickets: i32,
    ) -> Result<()>;
    fn delete(&self, user_id: &str) -> Result<usize>;
}
