use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::Result;
use crate::progression::experience::exp_to_db;
use crate::schema::activities;

use super::activities_model::{Activity, ActivityDB, NewActivity};
use super::activities_traits::ActivityRepositoryTrait;

/// Repository for the append-only experience history
pub struct ActivityRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ActivityRepository {
    /// Creates a new ActivityRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl ActivityRepositoryTrait for ActivityRepository {
    fn append(&self, conn: &mut SqliteConnection, new_activity: NewActivity) -> Result<Activity> {
        let now = Utc::now().naive_utc();
        let activity_db = ActivityDB {
            id: Uuid::new_v4().to_string(),
            user_id: new_activity.user_id,
            goal_id: new_activity.goal_id,
            small_goal_id: new_activity.small_goal_id,
            goal_title: new_activity.goal_title,
            small_goal_title: new_activity.small_goal_title,
            exp_gained: exp_to_db(new_activity.exp_gained),
            completed_at: new_activity.completed_at.unwrap_or(now),
            created_at: now,
        };

        diesel::insert_into(activities::table)
            .values(&activity_db)
            .execute(conn)?;

        Ok(activity_db.into())
    }

    fn list_for_user(&self, user_id: &str) -> Result<Vec<Activity>> {
        let mut conn = get_connection(&self.pool)?;
        let entries = activities::table
            .filter(activities::user_id.eq(user_id))
            .order(activities::completed_at.desc())
            .load::<ActivityDB>(&mut conn)?;
        Ok(entries.into_iter().map(Activity::from).collect())
    }
}
