use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::progression::experience::exp_from_db;

/// Domain model for one entry of the experience history.
///
/// Activities are written once when a completion posts experience and are
/// never updated or deleted; current state lives on the user and goal
/// rows, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub small_goal_id: Option<String>,
    pub goal_title: String,
    pub small_goal_title: Option<String>,
    pub exp_gained: Decimal,
    pub completed_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

/// Database model for activities
#[derive(Queryable, Selectable, Identifiable, Insertable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::activities)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ActivityDB {
    pub id: String,
    pub user_id: String,
    pub goal_id: String,
    pub small_goal_id: Option<String>,
    pub goal_title: String,
    pub small_goal_title: Option<String>,
    pub exp_gained: f64,
    pub completed_at: NaiveDateTime,
    pub created_at: NaiveDateTime,
}

impl From<ActivityDB> for Activity {
    fn from(db: ActivityDB) -> Self {
        Activity {
            id: db.id,
            user_id: db.user_id,
            goal_id: db.goal_id,
            small_goal_id: db.small_goal_id,
            goal_title: db.goal_title,
            small_goal_title: db.small_goal_title,
            exp_gained: exp_from_db(db.exp_gained),
            completed_at: db.completed_at,
            created_at: db.created_at,
        }
    }
}

/// Input model for appending a ledger entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub user_id: String,
    pub goal_id: String,
    pub small_goal_id: Option<String>,
    pub goal_title: String,
    pub small_goal_title: Option<String>,
    pub exp_gained: Decimal,
    /// Defaults to the append time when not provided
    pub completed_at: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn history_entries_serialize_camel_case() {
        let db = ActivityDB {
            id: "a1".to_string(),
            user_id: "u1".to_string(),
            goal_id: "g1".to_string(),
            small_goal_id: Some("s1".to_string()),
            goal_title: "Run a marathon".to_string(),
            small_goal_title: Some("Weekly training".to_string()),
            exp_gained: 3.6,
            completed_at: chrono::NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 3, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };
        let activity: Activity = db.into();
        assert_eq!(activity.exp_gained, dec!(3.6));

        let json = serde_json::to_value(&activity).unwrap();
        assert!(json.get("expGained").is_some());
        assert!(json.get("smallGoalId").is_some());
        assert!(json.get("exp_gained").is_none());
    }
}
