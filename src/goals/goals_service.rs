use chrono::Utc;
use log::error;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::activities::{ActivityRepositoryTrait, NewActivity};
use crate::db::{get_connection, DbPool};
use crate::errors::Result;
use crate::progression::experience::{goal_experience, small_goal_experience, task_experience};
use crate::progression::{ProgressionError, ProgressionService};
use crate::users::UserRepositoryTrait;

use super::goals_errors::GoalError;
use super::goals_model::{GoalCompletion, SmallGoalCompletion, TaskCompletion};
use super::goals_traits::GoalRepositoryTrait;

/// The completion cascade.
///
/// A parent only completes once every child has; completing posts the
/// aggregated experience to the user's ledger and appends one history
/// entry. Each operation runs in a single exclusive transaction, so the
/// completion flag, the posted experience, the rank/ticket reconciliation
/// and the history entry commit together or not at all.
pub struct GoalService<G, A, U>
where
    G: GoalRepositoryTrait,
    A: ActivityRepositoryTrait,
    U: UserRepositoryTrait,
{
    pool: Arc<DbPool>,
    goal_repo: Arc<G>,
    activity_repo: Arc<A>,
    progression: ProgressionService<U>,
}

impl<G, A, U> GoalService<G, A, U>
where
    G: GoalRepositoryTrait,
    A: ActivityRepositoryTrait,
    U: UserRepositoryTrait,
{
    pub fn new(
        pool: Arc<DbPool>,
        goal_repo: Arc<G>,
        activity_repo: Arc<A>,
        user_repo: Arc<U>,
    ) -> Self {
        Self {
            progression: ProgressionService::new(pool.clone(), user_repo),
            pool,
            goal_repo,
            activity_repo,
        }
    }

    /// Marks a task completed. With `claim_exp` the fixed task experience
    /// is posted right away and a history entry appended; the plain path
    /// only flips the flag and leaves the experience to be claimed through
    /// the owning small goal. Neither path looks at sibling tasks.
    pub fn complete_task(&self, task_id: &str, claim_exp: bool) -> Result<TaskCompletion> {
        let mut conn = get_connection(&self.pool)?;
        conn.immediate_transaction(|conn| {
            let task = self.goal_repo.get_task(conn, task_id)?;
            if task.completed {
                return Err(GoalError::AlreadyCompleted(format!("Task {}", task_id)).into());
            }

            self.goal_repo.mark_task_completed(conn, task_id)?;
            if !claim_exp {
                return Ok(TaskCompletion {
                    task_id: task.id,
                    exp_gained: Decimal::ZERO,
                    posting: None,
                });
            }

            let small_goal = self
                .goal_repo
                .get_small_goal_with_tasks(conn, &task.small_goal_id)?
                .small_goal;
            let goal = self.goal_repo.get_goal(conn, &small_goal.goal_id)?;

            let exp = task_experience();
            let posting = self.progression.post_experience(conn, &goal.user_id, exp)?;
            self.activity_repo.append(
                conn,
                NewActivity {
                    user_id: goal.user_id.clone(),
                    goal_id: goal.id.clone(),
                    small_goal_id: Some(small_goal.id.clone()),
                    goal_title: goal.title.clone(),
                    small_goal_title: Some(small_goal.title.clone()),
                    exp_gained: exp,
                    completed_at: None,
                },
            )?;

            Ok(TaskCompletion {
                task_id: task.id,
                exp_gained: exp,
                posting: Some(posting),
            })
        })
    }

    /// Completes a small goal once every task is done, freezing its
    /// experience and posting it to the owner's ledger.
    pub fn complete_small_goal(&self, small_goal_id: &str) -> Result<SmallGoalCompletion> {
        let mut conn = get_connection(&self.pool)?;
        conn.immediate_transaction(|conn| {
            let with_tasks = self.goal_repo.get_small_goal_with_tasks(conn, small_goal_id)?;
            let small_goal = with_tasks.small_goal;

            if small_goal.completed {
                return Err(
                    GoalError::AlreadyCompleted(format!("Small goal {}", small_goal_id)).into(),
                );
            }
            if with_tasks.tasks.is_empty() {
                error!("Small goal {} reached completion with no tasks", small_goal_id);
                return Err(ProgressionError::InvariantViolation(format!(
                    "small goal {} has no tasks",
                    small_goal_id
                ))
                .into());
            }
            let pending = with_tasks.tasks.iter().filter(|t| !t.completed).count();
            if pending > 0 {
                return Err(GoalError::IncompleteSubunits { pending }.into());
            }

            let exp = small_goal_experience(with_tasks.tasks.len(), &small_goal.difficulty);
            let completed_time = Utc::now().naive_utc();
            self.goal_repo
                .mark_small_goal_completed(conn, small_goal_id, exp, completed_time)?;

            let goal = self.goal_repo.get_goal(conn, &small_goal.goal_id)?;
            let posting = self.progression.post_experience(conn, &goal.user_id, exp)?;
            self.activity_repo.append(
                conn,
                NewActivity {
                    user_id: goal.user_id.clone(),
                    goal_id: goal.id.clone(),
                    small_goal_id: Some(small_goal.id.clone()),
                    goal_title: goal.title.clone(),
                    small_goal_title: Some(small_goal.title.clone()),
                    exp_gained: exp,
                    completed_at: Some(completed_time),
                },
            )?;

            Ok(SmallGoalCompletion {
                small_goal_id: small_goal.id,
                exp_gained: exp,
                posting,
            })
        })
    }

    /// Completes a goal once every small goal is done. The goal is worth
    /// the frozen small-goal experience summed and tripled.
    pub fn complete_goal(&self, goal_id: &str) -> Result<GoalCompletion> {
        let mut conn = get_connection(&self.pool)?;
        conn.immediate_transaction(|conn| {
            let with_children = self.goal_repo.get_goal_with_children(conn, goal_id)?;
            let goal = with_children.goal;

            if goal.completed {
                return Err(GoalError::AlreadyCompleted(format!("Goal {}", goal_id)).into());
            }
            let pending = with_children
                .small_goals
                .iter()
                .filter(|s| !s.small_goal.completed)
                .count();
            if pending > 0 {
                return Err(GoalError::IncompleteSubunits { pending }.into());
            }

            let exp = goal_experience(
                with_children
                    .small_goals
                    .iter()
                    .map(|s| s.small_goal.exp.unwrap_or_default()),
            );
            self.goal_repo.mark_goal_completed(conn, goal_id)?;

            let posting = self.progression.post_experience(conn, &goal.user_id, exp)?;
            self.activity_repo.append(
                conn,
                NewActivity {
                    user_id: goal.user_id.clone(),
                    goal_id: goal.id.clone(),
                    small_goal_id: None,
                    goal_title: goal.title.clone(),
                    small_goal_title: None,
                    exp_gained: exp,
                    completed_at: None,
                },
            )?;

            Ok(GoalCompletion {
                goal_id: goal.id,
                exp_gained: exp,
                posting,
            })
        })
    }
}
