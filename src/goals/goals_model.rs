use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result, ValidationError};
use crate::progression::experience::exp_from_db;
use crate::progression::{ExperiencePosting, DIFFICULTIES};

use super::goals_constants::{
    MAX_CONTENT_LENGTH, MAX_SMALL_GOALS_PER_GOAL, MAX_TASK_CONTENT_LENGTH, MAX_TITLE_LENGTH,
};

/// Domain model representing a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for goals
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: Option<String>,
    pub deadline: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Goal {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            content: db.content,
            deadline: db.deadline,
            completed: db.completed,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Domain model representing a small goal.
///
/// `exp` caches the experience the small goal is worth; it is refreshed
/// while the task set changes and frozen at completion time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallGoal {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub difficulty: String,
    pub deadline: Option<NaiveDateTime>,
    pub exp: Option<Decimal>,
    pub completed: bool,
    pub completed_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for small goals
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::small_goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SmallGoalDB {
    pub id: String,
    pub goal_id: String,
    pub title: String,
    pub difficulty: String,
    pub deadline: Option<NaiveDateTime>,
    pub exp: Option<f64>,
    pub completed: bool,
    pub completed_time: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<SmallGoalDB> for SmallGoal {
    fn from(db: SmallGoalDB) -> Self {
        SmallGoal {
            id: db.id,
            goal_id: db.goal_id,
            title: db.title,
            difficulty: db.difficulty,
            deadline: db.deadline,
            exp: db.exp.map(exp_from_db),
            completed: db.completed,
            completed_time: db.completed_time,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Domain model representing a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub small_goal_id: String,
    pub content: String,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for tasks
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskDB {
    pub id: String,
    pub small_goal_id: String,
    pub content: String,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<TaskDB> for Task {
    fn from(db: TaskDB) -> Self {
        Task {
            id: db.id,
            small_goal_id: db.small_goal_id,
            content: db.content,
            completed: db.completed,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// A small goal together with its tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallGoalWithTasks {
    pub small_goal: SmallGoal,
    pub tasks: Vec<Task>,
}

/// A goal together with its small goals and their tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalWithChildren {
    pub goal: Goal,
    pub small_goals: Vec<SmallGoalWithTasks>,
}

/// Input model for creating a new task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub content: String,
}

impl NewTask {
    /// Validates the new task data
    pub fn validate(&self) -> Result<()> {
        if self.content.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "content".to_string(),
            )));
        }
        if self.content.chars().count() > MAX_TASK_CONTENT_LENGTH {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Task content is too long (maximum is {} characters)",
                MAX_TASK_CONTENT_LENGTH
            ))));
        }
        Ok(())
    }
}

/// Input model for creating a new small goal with its initial tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSmallGoal {
    pub title: String,
    pub difficulty: String,
    pub deadline: Option<NaiveDateTime>,
    pub tasks: Vec<NewTask>,
}

impl NewSmallGoal {
    /// Validates the new small goal data
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Title is too long (maximum is {} characters)",
                MAX_TITLE_LENGTH
            ))));
        }
        if !DIFFICULTIES.contains(&self.difficulty.as_str()) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown difficulty '{}'",
                self.difficulty
            ))));
        }
        // A small goal can never exist without at least one task
        if self.tasks.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "A small goal needs at least one task".to_string(),
            )));
        }
        for task in &self.tasks {
            task.validate()?;
        }
        Ok(())
    }
}

/// Input model for creating a new goal with nested small goals
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub content: Option<String>,
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub small_goals: Vec<NewSmallGoal>,
}

impl NewGoal {
    /// Validates the new goal data
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Title is too long (maximum is {} characters)",
                MAX_TITLE_LENGTH
            ))));
        }
        if let Some(content) = &self.content {
            if content.chars().count() > MAX_CONTENT_LENGTH {
                return Err(Error::Validation(ValidationError::InvalidInput(format!(
                    "Content is too long (maximum is {} characters)",
                    MAX_CONTENT_LENGTH
                ))));
            }
        }
        if self.small_goals.len() > MAX_SMALL_GOALS_PER_GOAL {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "A goal can hold at most {} small goals",
                MAX_SMALL_GOALS_PER_GOAL
            ))));
        }
        for small_goal in &self.small_goals {
            small_goal.validate()?;
        }
        Ok(())
    }
}

/// Input model for updating a goal's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub id: String,
    pub title: String,
    pub content: Option<String>,
    pub deadline: Option<NaiveDate>,
}

/// Input model for updating a small goal's editable fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallGoalUpdate {
    pub id: String,
    pub title: String,
    pub difficulty: String,
    pub deadline: Option<NaiveDateTime>,
}

/// Result of completing a task
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompletion {
    pub task_id: String,
    pub exp_gained: Decimal,
    /// Present only on the experience-claiming path
    pub posting: Option<ExperiencePosting>,
}

/// Result of completing a small goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmallGoalCompletion {
    pub small_goal_id: String,
    pub exp_gained: Decimal,
    pub posting: ExperiencePosting,
}

/// Result of completing a goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalCompletion {
    pub goal_id: String,
    pub exp_gained: Decimal,
    pub posting: ExperiencePosting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progression::progression_constants::DIFFICULTY_NORMAL;

    fn small_goal_with_tasks(count: usize) -> NewSmallGoal {
        NewSmallGoal {
            title: "Practice".to_string(),
            difficulty: DIFFICULTY_NORMAL.to_string(),
            deadline: None,
            tasks: (0..count)
                .map(|i| NewTask {
                    content: format!("Step {}", i + 1),
                })
                .collect(),
        }
    }

    #[test]
    fn small_goal_requires_at_least_one_task() {
        assert!(small_goal_with_tasks(0).validate().is_err());
        assert!(small_goal_with_tasks(1).validate().is_ok());
    }

    #[test]
    fn small_goal_rejects_unknown_difficulty() {
        let mut small_goal = small_goal_with_tasks(2);
        small_goal.difficulty = "legendary".to_string();
        assert!(small_goal.validate().is_err());
    }

    #[test]
    fn goal_caps_nested_small_goals() {
        let goal = NewGoal {
            title: "Learn to swim".to_string(),
            content: None,
            deadline: None,
            small_goals: (0..6).map(|_| small_goal_with_tasks(1)).collect(),
        };
        assert!(goal.validate().is_err());
    }

    #[test]
    fn goal_accepts_the_cap_exactly() {
        let goal = NewGoal {
            title: "Learn to swim".to_string(),
            content: None,
            deadline: None,
            small_goals: (0..5).map(|_| small_goal_with_tasks(1)).collect(),
        };
        assert!(goal.validate().is_ok());
    }

    #[test]
    fn task_content_length_is_capped() {
        let task = NewTask {
            content: "a".repeat(51),
        };
        assert!(task.validate().is_err());
    }
}
