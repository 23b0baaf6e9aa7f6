use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::get_connection;
use crate::errors::{Error, Result, ValidationError};
use crate::progression::experience::{exp_to_db, small_goal_experience};
use crate::progression::DIFFICULTIES;
use crate::schema::{goals, small_goals, tasks};

use super::goals_constants::MAX_SMALL_GOALS_PER_GOAL;
use super::goals_errors::GoalError;
use super::goals_model::{
    Goal, GoalDB, GoalUpdate, GoalWithChildren, NewGoal, NewSmallGoal, NewTask, SmallGoal,
    SmallGoalDB, SmallGoalUpdate, SmallGoalWithTasks, Task, TaskDB,
};
use super::goals_traits::GoalRepositoryTrait;

/// Repository for the goal -> small goal -> task tree
pub struct GoalRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

fn not_found(entity: &str, id: &str) -> impl FnOnce(DieselError) -> Error {
    let message = format!("{} {} not found", entity, id);
    move |e| match e {
        DieselError::NotFound => Error::Goal(GoalError::NotFound(message)),
        other => other.into(),
    }
}

impl GoalRepository {
    /// Creates a new GoalRepository instance
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    /// Creates a goal together with its nested small goals and tasks.
    pub fn insert_new_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<GoalWithChildren> {
        new_goal.validate()?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            let now = Utc::now().naive_utc();
            let goal_db = GoalDB {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                title: new_goal.title,
                content: new_goal.content,
                deadline: new_goal.deadline,
                completed: false,
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(goals::table)
                .values(&goal_db)
                .execute(conn)?;

            let mut children = Vec::with_capacity(new_goal.small_goals.len());
            for new_small_goal in new_goal.small_goals {
                children.push(self.insert_small_goal_row(conn, &goal_db.id, new_small_goal, now)?);
            }

            Ok(GoalWithChildren {
                goal: goal_db.into(),
                small_goals: children,
            })
        })
    }

    /// Adds a small goal to an existing, still pending goal.
    pub fn insert_small_goal(
        &self,
        goal_id: &str,
        new_small_goal: NewSmallGoal,
    ) -> Result<SmallGoalWithTasks> {
        new_small_goal.validate()?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            let goal = self.get_goal(conn, goal_id)?;
            if goal.completed {
                return Err(
                    GoalError::AlreadyCompleted(format!("Goal {}", goal_id)).into(),
                );
            }

            let sibling_count: i64 = small_goals::table
                .filter(small_goals::goal_id.eq(goal_id))
                .count()
                .get_result(conn)?;
            if sibling_count as usize >= MAX_SMALL_GOALS_PER_GOAL {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "A goal can hold at most {} small goals",
                    MAX_SMALL_GOALS_PER_GOAL
                ))));
            }

            self.insert_small_goal_row(conn, goal_id, new_small_goal, Utc::now().naive_utc())
        })
    }

    fn insert_small_goal_row(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
        new_small_goal: NewSmallGoal,
        now: NaiveDateTime,
    ) -> Result<SmallGoalWithTasks> {
        let exp = small_goal_experience(new_small_goal.tasks.len(), &new_small_goal.difficulty);
        let small_goal_db = SmallGoalDB {
            id: Uuid::new_v4().to_string(),
            goal_id: goal_id.to_string(),
            title: new_small_goal.title,
            difficulty: new_small_goal.difficulty,
            deadline: new_small_goal.deadline,
            exp: Some(exp_to_db(exp)),
            completed: false,
            completed_time: None,
            created_at: now,
            updated_at: now,
        };
        diesel::insert_into(small_goals::table)
            .values(&small_goal_db)
            .execute(conn)?;

        let task_rows: Vec<TaskDB> = new_small_goal
            .tasks
            .into_iter()
            .map(|task| TaskDB {
                id: Uuid::new_v4().to_string(),
                small_goal_id: small_goal_db.id.clone(),
                content: task.content,
                completed: false,
                created_at: now,
                updated_at: now,
            })
            .collect();
        diesel::insert_into(tasks::table)
            .values(&task_rows)
            .execute(conn)?;

        Ok(SmallGoalWithTasks {
            small_goal: small_goal_db.into(),
            tasks: task_rows.into_iter().map(Task::from).collect(),
        })
    }

    /// Adds a task to a pending small goal and refreshes its cached
    /// experience.
    pub fn insert_task(&self, small_goal_id: &str, new_task: NewTask) -> Result<Task> {
        new_task.validate()?;

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            let with_tasks = self.get_small_goal_with_tasks(conn, small_goal_id)?;
            if with_tasks.small_goal.completed {
                return Err(
                    GoalError::AlreadyCompleted(format!("Small goal {}", small_goal_id)).into(),
                );
            }

            let now = Utc::now().naive_utc();
            let task_db = TaskDB {
                id: Uuid::new_v4().to_string(),
                small_goal_id: small_goal_id.to_string(),
                content: new_task.content,
                completed: false,
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(tasks::table)
                .values(&task_db)
                .execute(conn)?;

            self.refresh_cached_experience(conn, small_goal_id)?;
            Ok(task_db.into())
        })
    }

    /// Removes a task from a pending small goal. The last task can never
    /// be removed; a small goal without tasks is not a valid state.
    pub fn delete_task(&self, task_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            let task = self.get_task(conn, task_id)?;
            let with_tasks = self.get_small_goal_with_tasks(conn, &task.small_goal_id)?;
            if with_tasks.small_goal.completed {
                return Err(GoalError::AlreadyCompleted(format!(
                    "Small goal {}",
                    task.small_goal_id
                ))
                .into());
            }
            if with_tasks.tasks.len() <= 1 {
                return Err(GoalError::InvalidData(
                    "A small goal must keep at least one task".to_string(),
                )
                .into());
            }

            let affected = diesel::delete(tasks::table.find(task_id)).execute(conn)?;
            self.refresh_cached_experience(conn, &task.small_goal_id)?;
            Ok(affected)
        })
    }

    /// Updates a goal's editable fields. Completion state is owned by the
    /// cascade and is not touched here.
    pub fn update_goal(&self, goal_update: GoalUpdate) -> Result<Goal> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            diesel::update(goals::table.find(&goal_update.id))
                .set((
                    goals::title.eq(&goal_update.title),
                    goals::content.eq(goal_update.content.clone()),
                    goals::deadline.eq(goal_update.deadline),
                    goals::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;

            self.get_goal(conn, &goal_update.id)
        })
    }

    /// Updates a pending small goal; a difficulty change re-prices its
    /// cached experience.
    pub fn update_small_goal(&self, update: SmallGoalUpdate) -> Result<SmallGoal> {
        if !DIFFICULTIES.contains(&update.difficulty.as_str()) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown difficulty '{}'",
                update.difficulty
            ))));
        }

        let mut conn = get_connection(&self.pool)?;
        conn.transaction(|conn| {
            let existing = self.get_small_goal_with_tasks(conn, &update.id)?;
            if existing.small_goal.completed {
                return Err(
                    GoalError::AlreadyCompleted(format!("Small goal {}", update.id)).into(),
                );
            }

            diesel::update(small_goals::table.find(&update.id))
                .set((
                    small_goals::title.eq(&update.title),
                    small_goals::difficulty.eq(&update.difficulty),
                    small_goals::deadline.eq(update.deadline),
                    small_goals::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            self.refresh_cached_experience(conn, &update.id)?;

            Ok(self.get_small_goal_with_tasks(conn, &update.id)?.small_goal)
        })
    }

    pub fn delete_goal(&self, goal_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected = diesel::delete(goals::table.find(goal_id)).execute(&mut conn)?;
        if affected == 0 {
            return Err(Error::Goal(GoalError::NotFound(format!(
                "Goal {} not found",
                goal_id
            ))));
        }
        Ok(affected)
    }

    pub fn delete_small_goal(&self, small_goal_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;
        let affected =
            diesel::delete(small_goals::table.find(small_goal_id)).execute(&mut conn)?;
        if affected == 0 {
            return Err(Error::Goal(GoalError::NotFound(format!(
                "Small goal {} not found",
                small_goal_id
            ))));
        }
        Ok(affected)
    }

    /// Loads every goal of a user with small goals and tasks attached.
    pub fn list_goals_for_user(&self, user_id: &str) -> Result<Vec<GoalWithChildren>> {
        let mut conn = get_connection(&self.pool)?;

        let goal_rows = goals::table
            .filter(goals::user_id.eq(user_id))
            .order(goals::created_at.asc())
            .load::<GoalDB>(&mut conn)?;

        let goal_ids: Vec<String> = goal_rows.iter().map(|g| g.id.clone()).collect();
        let small_goal_rows = small_goals::table
            .filter(small_goals::goal_id.eq_any(&goal_ids))
            .order(small_goals::created_at.asc())
            .load::<SmallGoalDB>(&mut conn)?;

        let small_goal_ids: Vec<String> = small_goal_rows.iter().map(|s| s.id.clone()).collect();
        let task_rows = tasks::table
            .filter(tasks::small_goal_id.eq_any(&small_goal_ids))
            .order(tasks::created_at.asc())
            .load::<TaskDB>(&mut conn)?;

        let mut result = Vec::with_capacity(goal_rows.len());
        for goal_row in goal_rows {
            let children = small_goal_rows
                .iter()
                .filter(|s| s.goal_id == goal_row.id)
                .map(|s| SmallGoalWithTasks {
                    small_goal: s.clone().into(),
                    tasks: task_rows
                        .iter()
                        .filter(|t| t.small_goal_id == s.id)
                        .map(|t| t.clone().into())
                        .collect(),
                })
                .collect();
            result.push(GoalWithChildren {
                goal: goal_row.into(),
                small_goals: children,
            });
        }
        Ok(result)
    }

    /// The freshest completed small goals: last 24 hours first, falling
    /// back to the all-time newest when the day was quiet.
    pub fn latest_completed_small_goals(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<SmallGoal>> {
        let mut conn = get_connection(&self.pool)?;
        let since = Utc::now().naive_utc() - chrono::Duration::hours(24);

        let recent = small_goals::table
            .inner_join(goals::table)
            .filter(goals::user_id.eq(user_id))
            .filter(small_goals::completed.eq(true))
            .filter(small_goals::completed_time.gt(since))
            .select(SmallGoalDB::as_select())
            .order(small_goals::completed_time.desc())
            .limit(limit)
            .load::<SmallGoalDB>(&mut conn)?;

        let rows = if recent.is_empty() {
            small_goals::table
                .inner_join(goals::table)
                .filter(goals::user_id.eq(user_id))
                .filter(small_goals::completed.eq(true))
                .select(SmallGoalDB::as_select())
                .order(small_goals::completed_time.desc())
                .limit(limit)
                .load::<SmallGoalDB>(&mut conn)?
        } else {
            recent
        };

        Ok(rows.into_iter().map(SmallGoal::from).collect())
    }

    /// Re-prices the cached experience from the current task set. Frozen
    /// once the small goal completes.
    fn refresh_cached_experience(
        &self,
        conn: &mut SqliteConnection,
        small_goal_id: &str,
    ) -> Result<()> {
        let (difficulty, completed): (String, bool) = small_goals::table
            .find(small_goal_id)
            .select((small_goals::difficulty, small_goals::completed))
            .first(conn)
            .map_err(not_found("Small goal", small_goal_id))?;
        if completed {
            return Ok(());
        }

        let task_count: i64 = tasks::table
            .filter(tasks::small_goal_id.eq(small_goal_id))
            .count()
            .get_result(conn)?;
        let exp = small_goal_experience(task_count as usize, &difficulty);

        diesel::update(small_goals::table.find(small_goal_id))
            .set(small_goals::exp.eq(Some(exp_to_db(exp))))
            .execute(conn)?;
        Ok(())
    }
}

impl GoalRepositoryTrait for GoalRepository {
    fn get_goal(&self, conn: &mut SqliteConnection, goal_id: &str) -> Result<Goal> {
        let goal = goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first::<GoalDB>(conn)
            .map_err(not_found("Goal", goal_id))?;
        Ok(goal.into())
    }

    fn get_goal_with_children(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<GoalWithChildren> {
        let goal = self.get_goal(conn, goal_id)?;

        let small_goal_rows = small_goals::table
            .filter(small_goals::goal_id.eq(goal_id))
            .order(small_goals::created_at.asc())
            .load::<SmallGoalDB>(conn)?;

        let mut children = Vec::with_capacity(small_goal_rows.len());
        for small_goal_row in small_goal_rows {
            let task_rows = tasks::table
                .filter(tasks::small_goal_id.eq(&small_goal_row.id))
                .order(tasks::created_at.asc())
                .load::<TaskDB>(conn)?;
            children.push(SmallGoalWithTasks {
                small_goal: small_goal_row.into(),
                tasks: task_rows.into_iter().map(Task::from).collect(),
            });
        }

        Ok(GoalWithChildren {
            goal,
            small_goals: children,
        })
    }

    fn get_small_goal_with_tasks(
        &self,
        conn: &mut SqliteConnection,
        small_goal_id: &str,
    ) -> Result<SmallGoalWithTasks> {
        let small_goal_row = small_goals::table
            .find(small_goal_id)
            .select(SmallGoalDB::as_select())
            .first::<SmallGoalDB>(conn)
            .map_err(not_found("Small goal", small_goal_id))?;

        let task_rows = tasks::table
            .filter(tasks::small_goal_id.eq(small_goal_id))
            .order(tasks::created_at.asc())
            .load::<TaskDB>(conn)?;

        Ok(SmallGoalWithTasks {
            small_goal: small_goal_row.into(),
            tasks: task_rows.into_iter().map(Task::from).collect(),
        })
    }

    fn get_task(&self, conn: &mut SqliteConnection, task_id: &str) -> Result<Task> {
        let task = tasks::table
            .find(task_id)
            .select(TaskDB::as_select())
            .first::<TaskDB>(conn)
            .map_err(not_found("Task", task_id))?;
        Ok(task.into())
    }

    fn mark_task_completed(&self, conn: &mut SqliteConnection, task_id: &str) -> Result<()> {
        let affected = diesel::update(tasks::table.find(task_id))
            .set((
                tasks::completed.eq(true),
                tasks::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        if affected == 0 {
            return Err(Error::Goal(GoalError::NotFound(format!(
                "Task {} not found",
                task_id
            ))));
        }
        Ok(())
    }

    fn mark_small_goal_completed(
        &self,
        conn: &mut SqliteConnection,
        small_goal_id: &str,
        exp: Decimal,
        completed_time: NaiveDateTime,
    ) -> Result<()> {
        let affected = diesel::update(small_goals::table.find(small_goal_id))
            .set((
                small_goals::completed.eq(true),
                small_goals::completed_time.eq(Some(completed_time)),
                small_goals::exp.eq(Some(exp_to_db(exp))),
                small_goals::updated_at.eq(completed_time),
            ))
            .execute(conn)?;
        if affected == 0 {
            return Err(Error::Goal(GoalError::NotFound(format!(
                "Small goal {} not found",
                small_goal_id
            ))));
        }
        Ok(())
    }

    fn mark_goal_completed(&self, conn: &mut SqliteConnection, goal_id: &str) -> Result<()> {
        let affected = diesel::update(goals::table.find(goal_id))
            .set((
                goals::completed.eq(true),
                goals::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(conn)?;
        if affected == 0 {
            return Err(Error::Goal(GoalError::NotFound(format!(
                "Goal {} not found",
                goal_id
            ))));
        }
        Ok(())
    }
}
