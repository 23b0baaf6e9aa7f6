use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::DatabaseErrorKind;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::progression::experience::{exp_from_db, exp_to_db};
use crate::roulette::roulette_constants::DEFAULT_ROULETTE_TEXTS;
use crate::roulette::roulette_model::RouletteTextDB;
use crate::schema::{roulette_texts, users};

use super::users_errors::UserError;
use super::users_model::{NewUser, ProgressionSnapshot, User, UserDB};
use super::users_traits::UserRepositoryTrait;

/// Repository for managing user rows and their progression columns
pub struct UserRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl UserRepository {
    /// Creates a new UserRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl UserRepositoryTrait for UserRepository {
    /// Creates a user together with their twelve default roulette slots.
    fn create(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        let now = Utc::now().naive_utc();
        let user_db = UserDB {
            id: new_user
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_user.name,
            email: new_user.email,
            total_exp: 0.0,
            last_roulette_rank: 0,
            tickets: 0,
            created_at: now,
            updated_at: now,
        };

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            diesel::insert_into(users::table)
                .values(&user_db)
                .execute(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        Error::User(UserError::InvalidData(
                            "Email has already been taken".to_string(),
                        ))
                    }
                    other => other.into(),
                })?;

            let slots: Vec<RouletteTextDB> = DEFAULT_ROULETTE_TEXTS
                .iter()
                .enumerate()
                .map(|(index, text)| RouletteTextDB {
                    id: Uuid::new_v4().to_string(),
                    user_id: user_db.id.clone(),
                    number: index as i32 + 1,
                    text: (*text).to_string(),
                    created_at: now,
                    updated_at: now,
                })
                .collect();
            diesel::insert_into(roulette_texts::table)
                .values(&slots)
                .execute(conn)?;

            Ok(user_db.clone().into())
        })
    }

    fn get_by_id(&self, user_id: &str) -> Result<User> {
        let mut conn = get_connection(&self.pool)?;
        let user = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first::<UserDB>(&mut conn)
            .map_err(|e| match e {
                DieselError::NotFound => {
                    Error::User(UserError::NotFound(format!("User {} not found", user_id)))
                }
                other => other.into(),
            })?;
        Ok(user.into())
    }

    /// Reads the progression columns. Must be called on a connection that
    /// already holds the exclusive transaction for this mutation.
    fn get_progression(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
    ) -> Result<ProgressionSnapshot> {
        let (total_exp, last_roulette_rank, tickets) = users::table
            .find(user_id)
            .select((users::total_exp, users::last_roulette_rank, users::tickets))
            .first::<(f64, i32, i32)>(conn)
            .map_err(|e| match e {
                DieselError::NotFound => {
                    Error::User(UserError::NotFound(format!("User {} not found", user_id)))
                }
                other => other.into(),
            })?;

        Ok(ProgressionSnapshot {
            total_exp: exp_from_db(total_exp),
            last_roulette_rank,
            tickets,
        })
    }

    /// Narrow write of the three progression columns, nothing else.
    /// Invariants are the caller's responsibility; this is the
    /// "already validated, skip unrelated checks" storage path.
    fn update_progression(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        total_exp: Decimal,
        last_roulette_rank: i32,
        tickets: i32,
    ) -> Result<()> {
        let affected = diesel::update(users::table.find(user_id))
            .set((
                users::total_exp.eq(exp_to_db(total_exp)),
                users::last_roulette_rank.eq(last_roulette_rank),
                users::tickets.eq(tickets),
            ))
            .execute(conn)?;

        if affected == 0 {
            return Err(Error::User(UserError::NotFound(format!(
                "User {} not found",
                user_id
            ))));
        }
        Ok(())
    }

    /// Deletes a user; goals, tasks, activities and roulette slots go with
    /// them through the foreign keys.
    fn delete(&self, user_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(users::table.find(user_id)).execute(&mut conn)?;
        if affected == 0 {
            return Err(Error::User(UserError::NotFound(format!(
                "User {} not found",
                user_id
            ))));
        }
        Ok(affected)
    }
}
