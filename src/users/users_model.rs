use chrono::NaiveDateTime;
use diesel::prelude::*;
use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::goals::SmallGoal;
use crate::progression::experience::exp_from_db;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"(?i)^[\w+\-.]+@[a-z\d\-]+(\.[a-z\d\-]+)*\.[a-z]+$")
            .expect("email regex is valid");
}

pub const MAX_NAME_LENGTH: usize = 50;
pub const MAX_EMAIL_LENGTH: usize = 255;

/// Domain model representing a user and their progression ledger
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_exp: Decimal,
    pub last_roulette_rank: i32,
    pub tickets: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for users
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_exp: f64,
    pub last_roulette_rank: i32,
    pub tickets: i32,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        User {
            id: db.id,
            name: db.name,
            email: db.email,
            total_exp: exp_from_db(db.total_exp),
            last_roulette_rank: db.last_roulette_rank,
            tickets: db.tickets,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Input model for creating a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

impl NewUser {
    /// Validates the new user data
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.name.chars().count() > MAX_NAME_LENGTH {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Name is too long (maximum is {} characters)",
                MAX_NAME_LENGTH
            ))));
        }
        if self.email.chars().count() > MAX_EMAIL_LENGTH || !EMAIL_REGEX.is_match(&self.email) {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Email address is not valid".to_string(),
            )));
        }
        Ok(())
    }
}

/// The three progression columns read and written under the per-user lock
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionSnapshot {
    pub total_exp: Decimal,
    pub last_roulette_rank: i32,
    pub tickets: i32,
}

/// Profile payload composing the ledger with recent completions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub total_exp: Decimal,
    pub rank: i32,
    pub last_roulette_rank: i32,
    pub tickets: i32,
    pub latest_completed_small_goals: Vec<SmallGoal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, email: &str) -> NewUser {
        NewUser {
            id: None,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    #[test]
    fn accepts_a_well_formed_user() {
        assert!(new_user("Hana", "hana@example.com").validate().is_ok());
    }

    #[test]
    fn rejects_blank_name_and_overlong_name() {
        assert!(new_user("", "hana@example.com").validate().is_err());
        assert!(new_user(&"a".repeat(51), "hana@example.com")
            .validate()
            .is_err());
    }

    #[test]
    fn rejects_malformed_email() {
        assert!(new_user("Hana", "not-an-email").validate().is_err());
        assert!(new_user("Hana", "hana@example").validate().is_err());
        assert!(new_user("Hana", "hana@exam ple.com").validate().is_err());
    }
}
