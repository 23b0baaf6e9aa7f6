use chrono::NaiveDateTime;
use diesel::sqlite::SqliteConnection;
use rust_decimal::Decimal;

use crate::errors::Result;
use crate::goals::goals_model::{Goal, GoalWithChildren, SmallGoalWithTasks, Task};

/// Trait for the goal-tree operations the completion cascade needs.
///
/// Every method takes a connection: guards are checked and completion
/// flags written inside the caller's transaction, so what was read is
/// what gets gated on.
pub trait GoalRepositoryTrait: Send + Sync {
    fn get_goal(&self, conn: &mut SqliteConnection, goal_id: &str) -> Result<Goal>;
    fn get_goal_with_children(
        &self,
        conn: &mut SqliteConnection,
        goal_id: &str,
    ) -> Result<GoalWithChildren>;
    fn get_small_goal_with_tasks(
        &self,
        conn: &mut SqliteConnection,
        small_goal_id: &str,
    ) -> Result<SmallGoalWithTasks>;
    fn get_task(&self, conn: &mut SqliteConnection, task_id: &str) -> Result<Task>;
    fn mark_task_completed(&self, conn: &mut SqliteConnection, task_id: &str) -> Result<()>;
    /// Also freezes the experience value the small goal was completed at.
    fn mark_small_goal_completed(
        &self,
        conn: &mut SqliteConnection,
        small_goal_id: &str,
        exp: Decimal,
        completed_time: NaiveDateTime,
    ) -> Result<()>;
    fn mark_goal_completed(&self, conn: &mut SqliteConnection, goal_id: &str) -> Result<()>;
}
