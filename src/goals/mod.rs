pub mod goals_constants;
pub mod goals_errors;
pub mod goals_model;
pub mod goals_repository;
pub mod goals_service;
pub mod goals_traits;

pub use goals_errors::GoalError;
pub use goals_model::{
    Goal, GoalCompletion, GoalUpdate, GoalWithChildren, NewGoal, NewSmallGoal, NewTask, SmallGoal,
    SmallGoalCompletion, SmallGoalUpdate, SmallGoalWithTasks, Task, TaskCompletion,
};
pub use goals_repository::GoalRepository;
pub use goals_service::GoalService;
pub use goals_traits::GoalRepositoryTrait;
