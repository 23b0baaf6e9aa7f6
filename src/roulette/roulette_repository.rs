use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::schema::roulette_texts;

use super::roulette_errors::RouletteError;
use super::roulette_model::{RouletteText, RouletteTextDB, RouletteTextUpdate};

/// Repository for the fixed set of roulette slots each user owns
pub struct RouletteRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl RouletteRepository {
    /// Creates a new RouletteRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Lists a user's slots in wheel order.
    pub fn list_for_user(&self, user_id: &str) -> Result<Vec<RouletteText>> {
        let mut conn = get_connection(&self.pool)?;
        let slots = roulette_texts::table
            .filter(roulette_texts::user_id.eq(user_id))
            .order(roulette_texts::number.asc())
            .load::<RouletteTextDB>(&mut conn)?;
        Ok(slots.into_iter().map(RouletteText::from).collect())
    }

    pub fn get_by_number(&self, user_id: &str, number: i32) -> Result<RouletteText> {
        let mut conn = get_connection(&self.pool)?;
        let slot = roulette_texts::table
            .filter(roulette_texts::user_id.eq(user_id))
            .filter(roulette_texts::number.eq(number))
            .first::<RouletteTextDB>(&mut conn)
            .map_err(|e| match e {
                DieselError::NotFound => Error::Roulette(RouletteError::NotFound(format!(
                    "Roulette slot {} not found",
                    number
                ))),
                other => other.into(),
            })?;
        Ok(slot.into())
    }

    /// Rewrites the reward text of one slot.
    pub fn update_text(&self, user_id: &str, update: RouletteTextUpdate) -> Result<RouletteText> {
        update.validate()?;

        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::update(
            roulette_texts::table
                .filter(roulette_texts::user_id.eq(user_id))
                .filter(roulette_texts::number.eq(update.number)),
        )
        .set((
            roulette_texts::text.eq(update.normalized_text()),
            roulette_texts::updated_at.eq(Utc::now().naive_utc()),
        ))
        .execute(&mut conn)?;

        if affected == 0 {
            return Err(Error::Roulette(RouletteError::NotFound(format!(
                "Roulette slot {} not found",
                update.number
            ))));
        }
        self.get_by_number(user_id, update.number)
    }
}
