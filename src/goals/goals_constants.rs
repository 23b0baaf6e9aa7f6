/// Structural limits enforced when goals and their children are created
/// or edited
pub const MAX_SMALL_GOALS_PER_GOAL: usize = 5;

pub const MAX_TITLE_LENGTH: usize = 50;

pub const MAX_CONTENT_LENGTH: usize = 1000;

pub const MAX_TASK_CONTENT_LENGTH: usize = 50;
