pub mod experience;
pub mod progression_constants;
pub mod progression_errors;
pub mod progression_model;
pub mod progression_service;
pub mod rank_table;

pub use experience::{goal_experience, small_goal_experience, task_experience};
pub use progression_constants::{multiplier_for, DIFFICULTIES, GOAL_COMPLETION_BONUS, MAX_RANK};
pub use progression_errors::ProgressionError;
pub use progression_model::{ExperiencePosting, TicketAward, TicketSpend};
pub use progression_service::ProgressionService;
pub use rank_table::{calculate_rank, rank_decade};
