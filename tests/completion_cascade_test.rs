use rust_decimal_macros::dec;

use questlog_core::activities::{ActivityRepository, ActivityRepositoryTrait};
use questlog_core::goals::{GoalError, GoalRepository, GoalRepositoryTrait, NewTask};
use questlog_core::{db, Error};

mod common;

#[test]
fn completing_a_small_goal_posts_its_frozen_experience() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "hard", 3);
    let small_goal = &goal.small_goals[0];

    let service = common::goal_service(&pool);
    common::finish_all_tasks(&service, &small_goal.tasks);

    let completion = service
        .complete_small_goal(&small_goal.small_goal.id)
        .unwrap();

    // 3 tasks x 1.2 = 3.6
    assert_eq!(completion.exp_gained, dec!(3.6));
    assert_eq!(completion.posting.total_exp, dec!(3.6));

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(3.6));

    let mut conn = db::get_connection(&pool).unwrap();
    let repo = GoalRepository::new(pool.clone());
    let stored = repo
        .get_small_goal_with_tasks(&mut conn, &small_goal.small_goal.id)
        .unwrap();
    assert!(stored.small_goal.completed);
    assert!(stored.small_goal.completed_time.is_some());
    assert_eq!(stored.small_goal.exp, Some(dec!(3.6)));

    let activities = ActivityRepository::new(pool.clone())
        .list_for_user(&user.id)
        .unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0].exp_gained, dec!(3.6));
    assert_eq!(
        activities[0].small_goal_id.as_deref(),
        Some(small_goal.small_goal.id.as_str())
    );
}

#[test]
fn a_pending_task_blocks_small_goal_completion_and_nothing_changes() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "normal", 2);
    let small_goal = &goal.small_goals[0];

    let service = common::goal_service(&pool);
    service
        .complete_task(&small_goal.tasks[0].id, false)
        .unwrap();

    let err = service
        .complete_small_goal(&small_goal.small_goal.id)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Goal(GoalError::IncompleteSubunits { pending: 1 })
    ));

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(0));
    assert_eq!(reloaded.tickets, 0);

    let mut conn = db::get_connection(&pool).unwrap();
    let stored = GoalRepository::new(pool.clone())
        .get_small_goal_with_tasks(&mut conn, &small_goal.small_goal.id)
        .unwrap();
    assert!(!stored.small_goal.completed);

    let activities = ActivityRepository::new(pool.clone())
        .list_for_user(&user.id)
        .unwrap();
    assert!(activities.is_empty());
}

#[test]
fn retried_small_goal_completion_does_not_double_post() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "hard", 3);
    let small_goal = &goal.small_goals[0];

    let service = common::goal_service(&pool);
    common::finish_all_tasks(&service, &small_goal.tasks);
    service
        .complete_small_goal(&small_goal.small_goal.id)
        .unwrap();

    let err = service
        .complete_small_goal(&small_goal.small_goal.id)
        .unwrap_err();
    assert!(matches!(err, Error::Goal(GoalError::AlreadyCompleted(_))));

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(3.6));
    let activities = ActivityRepository::new(pool.clone())
        .list_for_user(&user.id)
        .unwrap();
    assert_eq!(activities.len(), 1);
}

#[test]
fn completing_the_goal_triples_the_frozen_sum() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "hard", 3);
    let small_goal = &goal.small_goals[0];

    let service = common::goal_service(&pool);
    common::finish_all_tasks(&service, &small_goal.tasks);
    service
        .complete_small_goal(&small_goal.small_goal.id)
        .unwrap();

    let completion = service.complete_goal(&goal.goal.id).unwrap();

    // round(3.6 * 3) = round(10.8) = 11
    assert_eq!(completion.exp_gained, dec!(11));
    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(14.6));

    let activities = ActivityRepository::new(pool.clone())
        .list_for_user(&user.id)
        .unwrap();
    assert_eq!(activities.len(), 2);

    let mut conn = db::get_connection(&pool).unwrap();
    let stored = GoalRepository::new(pool.clone())
        .get_goal(&mut conn, &goal.goal.id)
        .unwrap();
    assert!(stored.completed);
}

#[test]
fn a_pending_small_goal_blocks_goal_completion() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "easy", 1);

    let service = common::goal_service(&pool);
    let err = service.complete_goal(&goal.goal.id).unwrap_err();
    assert!(matches!(
        err,
        Error::Goal(GoalError::IncompleteSubunits { pending: 1 })
    ));

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(0));
}

#[test]
fn claiming_a_task_posts_one_point_without_touching_the_small_goal() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "normal", 2);
    let small_goal = &goal.small_goals[0];

    let service = common::goal_service(&pool);
    let completion = service.complete_task(&small_goal.tasks[0].id, true).unwrap();

    assert_eq!(completion.exp_gained, dec!(1));
    assert!(completion.posting.is_some());

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(1));

    let mut conn = db::get_connection(&pool).unwrap();
    let stored = GoalRepository::new(pool.clone())
        .get_small_goal_with_tasks(&mut conn, &small_goal.small_goal.id)
        .unwrap();
    assert!(!stored.small_goal.completed);
}

#[test]
fn a_completed_task_rejects_re_completion() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "normal", 1);
    let task = &goal.small_goals[0].tasks[0];

    let service = common::goal_service(&pool);
    service.complete_task(&task.id, true).unwrap();

    let err = service.complete_task(&task.id, true).unwrap_err();
    assert!(matches!(err, Error::Goal(GoalError::AlreadyCompleted(_))));

    // the retry posted nothing
    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, dec!(1));
}

#[test]
fn changing_the_task_set_reprices_a_pending_small_goal() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "hard", 3);
    let small_goal = &goal.small_goals[0];
    assert_eq!(small_goal.small_goal.exp, Some(dec!(3.6)));

    let repo = GoalRepository::new(pool.clone());
    repo.insert_task(
        &small_goal.small_goal.id,
        NewTask {
            content: "One more session".to_string(),
        },
    )
    .unwrap();

    let mut conn = db::get_connection(&pool).unwrap();
    let stored = repo
        .get_small_goal_with_tasks(&mut conn, &small_goal.small_goal.id)
        .unwrap();
    // 4 tasks x 1.2 = 4.8
    assert_eq!(stored.small_goal.exp, Some(dec!(4.8)));
    assert_eq!(stored.tasks.len(), 4);
}

#[test]
fn the_last_task_cannot_be_removed() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let goal = common::goal_with_small_goal(&pool, &user.id, "normal", 1);
    let task = &goal.small_goals[0].tasks[0];

    let repo = GoalRepository::new(pool.clone());
    let err = repo.delete_task(&task.id).unwrap_err();
    assert!(matches!(err, Error::Goal(GoalError::InvalidData(_))));
}
