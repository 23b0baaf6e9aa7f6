use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

use super::roulette_constants::{MAX_ROULETTE_TEXT_LENGTH, ROULETTE_SLOT_COUNT};
use super::roulette_errors::RouletteError;

/// Domain model for one slot of a user's roulette wheel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouletteText {
    pub id: String,
    pub user_id: String,
    pub number: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for roulette slots
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::roulette_texts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RouletteTextDB {
    pub id: String,
    pub user_id: String,
    pub number: i32,
    pub text: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<RouletteTextDB> for RouletteText {
    fn from(db: RouletteTextDB) -> Self {
        RouletteText {
            id: db.id,
            user_id: db.user_id,
            number: db.number,
            text: db.text,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for rewriting a slot's reward text
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouletteTextUpdate {
    pub number: i32,
    pub text: String,
}

impl RouletteTextUpdate {
    /// Validates the slot update; the text is normalized before saving.
    pub fn validate(&self) -> Result<()> {
        if self.number < 1 || self.number > ROULETTE_SLOT_COUNT {
            return Err(Error::Roulette(RouletteError::InvalidData(format!(
                "Slot number must be between 1 and {}",
                ROULETTE_SLOT_COUNT
            ))));
        }
        if self.text.trim().is_empty() {
            return Err(Error::Roulette(RouletteError::InvalidData(
                "Please set the reward text".to_string(),
            )));
        }
        if self.text.chars().count() > MAX_ROULETTE_TEXT_LENGTH {
            return Err(Error::Roulette(RouletteError::InvalidData(format!(
                "Reward text is too long (maximum is {} characters)",
                MAX_ROULETTE_TEXT_LENGTH
            ))));
        }
        Ok(())
    }

    /// Collapses runs of spaces and trims the ends, the same clean-up the
    /// slot texts get everywhere else.
    pub fn normalized_text(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut last_was_space = false;
        for ch in self.text.trim().chars() {
            if ch == ' ' {
                if !last_was_space {
                    out.push(ch);
                }
                last_was_space = true;
            } else {
                out.push(ch);
                last_was_space = false;
            }
        }
        out
    }
}

/// Result of spinning the wheel
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpinResult {
    pub slot: RouletteText,
    pub tickets_remaining: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_number_must_be_on_the_wheel() {
        let update = RouletteTextUpdate {
            number: 0,
            text: "Snack".to_string(),
        };
        assert!(update.validate().is_err());

        let update = RouletteTextUpdate {
            number: 13,
            text: "Snack".to_string(),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn text_is_required_and_capped() {
        let update = RouletteTextUpdate {
            number: 3,
            text: "  ".to_string(),
        };
        assert!(update.validate().is_err());

        let update = RouletteTextUpdate {
            number: 3,
            text: "a".repeat(51),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn normalization_collapses_inner_spaces() {
        let update = RouletteTextUpdate {
            number: 1,
            text: "  tea   with   friends ".to_string(),
        };
        assert_eq!(update.normalized_text(), "tea with friends");
    }
}
