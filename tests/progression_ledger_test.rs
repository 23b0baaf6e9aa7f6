use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use questlog_core::progression::ProgressionError;
use questlog_core::users::{UserRepository, UserRepositoryTrait};
use questlog_core::{db, Error};

mod common;

#[test]
fn crossing_into_a_new_decade_awards_one_ticket() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let service = common::progression_service(&pool);

    // 100 exp sits in the rank 10 band, the first decade boundary
    let mut conn = db::get_connection(&pool).unwrap();
    let posting = service
        .post_experience(&mut conn, &user.id, dec!(100))
        .unwrap();

    assert_eq!(posting.rank, 10);
    assert_eq!(posting.tickets_awarded, 1);
    assert_eq!(posting.tickets, 1);

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.last_roulette_rank, 10);
    assert_eq!(reloaded.tickets, 1);
}

#[test]
fn awarding_again_without_new_experience_is_a_no_op() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let service = common::progression_service(&pool);

    let mut conn = db::get_connection(&pool).unwrap();
    service
        .post_experience(&mut conn, &user.id, dec!(100))
        .unwrap();

    let second = service
        .award_tickets_if_crossed_decade(&mut conn, &user.id)
        .unwrap();
    assert_eq!(second.tickets_awarded, 0);
    assert_eq!(second.tickets, 1);

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.tickets, 1);
    assert_eq!(reloaded.last_roulette_rank, 10);
}

#[test]
fn crossing_two_decades_at_once_awards_two_tickets() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let repo = UserRepository::new(pool.clone());
    let service = common::progression_service(&pool);

    // 330 exp maps to rank 21; tickets were last settled at rank 9
    let mut conn = db::get_connection(&pool).unwrap();
    repo.update_progression(&mut conn, &user.id, dec!(330), 9, 0)
        .unwrap();

    let award = service
        .award_tickets_if_crossed_decade(&mut conn, &user.id)
        .unwrap();
    assert_eq!(award.rank, 21);
    assert_eq!(award.tickets_awarded, 2);

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.tickets, 2);
    assert_eq!(reloaded.last_roulette_rank, 21);
}

#[test]
fn moving_within_a_decade_awards_nothing() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let repo = UserRepository::new(pool.clone());
    let service = common::progression_service(&pool);

    // 280 exp maps to rank 19, same decade as the settled rank 10
    let mut conn = db::get_connection(&pool).unwrap();
    repo.update_progression(&mut conn, &user.id, dec!(280), 10, 1)
        .unwrap();

    let award = service
        .award_tickets_if_crossed_decade(&mut conn, &user.id)
        .unwrap();
    assert_eq!(award.tickets_awarded, 0);

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.tickets, 1);
    assert_eq!(reloaded.last_roulette_rank, 10);
}

#[test]
fn negative_experience_amounts_are_a_contract_violation() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let service = common::progression_service(&pool);

    let mut conn = db::get_connection(&pool).unwrap();
    let err = service
        .add_experience(&mut conn, &user.id, dec!(-1))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Progression(ProgressionError::InvariantViolation(_))
    ));

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.total_exp, Decimal::ZERO);
}

#[test]
fn spending_tickets_stops_at_zero() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let repo = Arc::new(UserRepository::new(pool.clone()));
    let service = common::progression_service(&pool);

    let mut conn = db::get_connection(&pool).unwrap();
    repo.update_progression(&mut conn, &user.id, Decimal::ZERO, 0, 2)
        .unwrap();
    drop(conn);

    assert_eq!(service.spend_ticket(&user.id).unwrap().tickets_remaining, 1);
    assert_eq!(service.spend_ticket(&user.id).unwrap().tickets_remaining, 0);

    let err = service.spend_ticket(&user.id).unwrap_err();
    assert!(matches!(
        err,
        Error::Progression(ProgressionError::InsufficientTickets)
    ));

    let reloaded = common::reload_user(&pool, &user.id);
    assert_eq!(reloaded.tickets, 0);
}

#[test]
fn experience_posts_accumulate_across_completions() {
    let (pool, _dir) = common::setup_pool();
    let user = common::create_user(&pool);
    let service = common::progression_service(&pool);

    let mut conn = db::get_connection(&pool).unwrap();
    service
        .post_experience(&mut conn, &user.id, dec!(3.6))
        .unwrap();
    let posting = service
        .post_experience(&mut conn, &user.id, dec!(11))
        .unwrap();

    assert_eq!(posting.total_exp, dec!(14.6));
    assert_eq!(posting.rank, 2); // 14.6 is still below the rank 3 threshold of 15
}
