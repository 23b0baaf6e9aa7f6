#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;

use questlog_core::activities::ActivityRepository;
use questlog_core::db::{self, DbPool};
use questlog_core::goals::{
    GoalRepository, GoalService, GoalWithChildren, NewGoal, NewSmallGoal, NewTask,
};
use questlog_core::progression::ProgressionService;
use questlog_core::users::{NewUser, User, UserRepository, UserRepositoryTrait};

static NEXT_EMAIL: AtomicUsize = AtomicUsize::new(0);

/// A migrated throwaway database. Keep the TempDir alive for as long as
/// the pool is used.
pub fn setup_pool() -> (Arc<DbPool>, TempDir) {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = db::init(dir.path().to_str().unwrap()).expect("init database");
    let pool = db::create_pool(&db_path).expect("create pool");
    db::run_migrations(&pool).expect("run migrations");
    (pool, dir)
}

pub fn create_user(pool: &Arc<DbPool>) -> User {
    let repo = UserRepository::new(pool.clone());
    let email = format!(
        "tester{}@example.com",
        NEXT_EMAIL.fetch_add(1, Ordering::Relaxed)
    );
    repo.create(NewUser {
        id: None,
        name: "Test User".to_string(),
        email,
    })
    .expect("create user")
}

pub fn goal_service(
    pool: &Arc<DbPool>,
) -> GoalService<GoalRepository, ActivityRepository, UserRepository> {
    GoalService::new(
        pool.clone(),
        Arc::new(GoalRepository::new(pool.clone())),
        Arc::new(ActivityRepository::new(pool.clone())),
        Arc::new(UserRepository::new(pool.clone())),
    )
}

pub fn progression_service(pool: &Arc<DbPool>) -> ProgressionService<UserRepository> {
    ProgressionService::new(pool.clone(), Arc::new(UserRepository::new(pool.clone())))
}

/// Creates a goal holding one small goal of the given difficulty with
/// `task_count` tasks.
pub fn goal_with_small_goal(
    pool: &Arc<DbPool>,
    user_id: &str,
    difficulty: &str,
    task_count: usize,
) -> GoalWithChildren {
    let repo = GoalRepository::new(pool.clone());
    repo.insert_new_goal(
        user_id,
        NewGoal {
            title: "Run a marathon".to_string(),
            content: Some("Train up from nothing".to_string()),
            deadline: None,
            small_goals: vec![small_goal_input("Weekly training", difficulty, task_count)],
        },
    )
    .expect("create goal")
}

pub fn small_goal_input(title: &str, difficulty: &str, task_count: usize) -> NewSmallGoal {
    NewSmallGoal {
        title: title.to_string(),
        difficulty: difficulty.to_string(),
        deadline: None,
        tasks: (0..task_count)
            .map(|i| NewTask {
                content: format!("Session {}", i + 1),
            })
            .collect(),
    }
}

/// Marks every task of the small goal completed through the plain,
/// non-claiming path.
pub fn finish_all_tasks(
    service: &GoalService<GoalRepository, ActivityRepository, UserRepository>,
    tasks: &[questlog_core::goals::Task],
) {
    for task in tasks {
        service
            .complete_task(&task.id, false)
            .expect("complete task");
    }
}

pub fn reload_user(pool: &Arc<DbPool>, user_id: &str) -> User {
    UserRepository::new(pool.clone())
        .get_by_id(user_id)
        .expect("reload user")
}
