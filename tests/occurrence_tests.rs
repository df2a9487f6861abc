mod common;
use common::{datetime, monday_coaching_pattern, open_pool, setup_test_db};

use rsessionbook::core::generate::Horizon;
use rsessionbook::core::occurrence::{OccurrenceLogic, OccurrenceUpdate};
use rsessionbook::errors::AppError;
use rsessionbook::models::status::OccurrenceStatus;

#[test]
fn standalone_create_rejects_nonpositive_duration() {
    let db_path = setup_test_db("occurrence_bad_duration");
    let pool = open_pool(&db_path);

    let err = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Broken",
        datetime(2024, 11, 20, 15, 0),
        0,
        "",
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn standalone_create_defaults() {
    let db_path = setup_test_db("occurrence_standalone_defaults");
    let pool = open_pool(&db_path);

    let o = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Intro Call",
        datetime(2024, 11, 20, 15, 0),
        45,
        "First contact",
    )
    .expect("create standalone");

    assert!(o.id > 0);
    assert_eq!(o.pattern_id, None);
    assert_eq!(o.status, OccurrenceStatus::Scheduled);
    assert!(!o.is_exception);
}

#[test]
fn moving_a_pattern_row_promotes_it_to_exception() {
    let db_path = setup_test_db("occurrence_promote_exception");
    let mut pool = open_pool(&db_path);
    monday_coaching_pattern(&mut pool, Some(Horizon::Months(3)));

    let rows = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 12, 1, 0, 0),
        None,
    )
    .expect("list");
    assert!(!rows[0].is_exception);

    let upd = OccurrenceUpdate {
        start_datetime: Some(datetime(2024, 11, 4, 14, 0)),
        ..Default::default()
    };
    let moved = OccurrenceLogic::update(&pool.conn, rows[0].id, &upd).expect("move row");
    assert!(moved.is_exception);
    assert_eq!(moved.start_datetime, datetime(2024, 11, 4, 14, 0));
}

#[test]
fn title_only_update_does_not_promote() {
    let db_path = setup_test_db("occurrence_title_update");
    let mut pool = open_pool(&db_path);
    monday_coaching_pattern(&mut pool, Some(Horizon::Months(3)));

    let rows = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 12, 1, 0, 0),
        None,
    )
    .expect("list");

    let upd = OccurrenceUpdate {
        title: Some("Renamed".into()),
        ..Default::default()
    };
    let renamed = OccurrenceLogic::update(&pool.conn, rows[0].id, &upd).expect("rename row");
    assert_eq!(renamed.title, "Renamed");
    assert!(!renamed.is_exception);
}

#[test]
fn moving_a_standalone_row_never_marks_exception() {
    let db_path = setup_test_db("occurrence_standalone_move");
    let pool = open_pool(&db_path);

    let o = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Intro Call",
        datetime(2024, 11, 20, 15, 0),
        45,
        "",
    )
    .expect("create standalone");

    let upd = OccurrenceUpdate {
        start_datetime: Some(datetime(2024, 11, 21, 9, 0)),
        ..Default::default()
    };
    let moved = OccurrenceLogic::update(&pool.conn, o.id, &upd).expect("move");
    assert!(!moved.is_exception);
}

#[test]
fn cancel_twice_fails() {
    let db_path = setup_test_db("occurrence_cancel_twice");
    let pool = open_pool(&db_path);

    let o = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Intro Call",
        datetime(2024, 11, 20, 15, 0),
        45,
        "",
    )
    .expect("create standalone");

    let cancelled = OccurrenceLogic::cancel(&pool.conn, o.id).expect("first cancel");
    assert_eq!(cancelled.status, OccurrenceStatus::Cancelled);

    let err = OccurrenceLogic::cancel(&pool.conn, o.id).unwrap_err();
    assert!(matches!(err, AppError::AlreadyCancelled));
}

#[test]
fn complete_twice_fails() {
    let db_path = setup_test_db("occurrence_complete_twice");
    let pool = open_pool(&db_path);

    let o = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Intro Call",
        datetime(2024, 11, 20, 15, 0),
        45,
        "",
    )
    .expect("create standalone");

    OccurrenceLogic::complete(&pool.conn, o.id).expect("first complete");
    let err = OccurrenceLogic::complete(&pool.conn, o.id).unwrap_err();
    assert!(matches!(err, AppError::AlreadyCompleted));
}

#[test]
fn cancelled_cannot_complete_and_completed_cannot_cancel() {
    let db_path = setup_test_db("occurrence_terminal_states");
    let pool = open_pool(&db_path);

    let a = OccurrenceLogic::create_standalone(
        &pool.conn,
        "A",
        datetime(2024, 11, 20, 15, 0),
        45,
        "",
    )
    .expect("create a");
    OccurrenceLogic::cancel(&pool.conn, a.id).expect("cancel a");
    let err = OccurrenceLogic::complete(&pool.conn, a.id).unwrap_err();
    assert!(matches!(err, AppError::CancelledCannotComplete));

    let b = OccurrenceLogic::create_standalone(
        &pool.conn,
        "B",
        datetime(2024, 11, 21, 15, 0),
        45,
        "",
    )
    .expect("create b");
    OccurrenceLogic::complete(&pool.conn, b.id).expect("complete b");
    let err = OccurrenceLogic::cancel(&pool.conn, b.id).unwrap_err();
    assert!(matches!(err, AppError::AlreadyCompleted));
}

#[test]
fn cancelling_a_pattern_row_marks_it_exception() {
    let db_path = setup_test_db("occurrence_cancel_marks_exception");
    let mut pool = open_pool(&db_path);
    monday_coaching_pattern(&mut pool, Some(Horizon::Months(3)));

    let rows = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 12, 1, 0, 0),
        None,
    )
    .expect("list");

    let cancelled = OccurrenceLogic::cancel(&pool.conn, rows[0].id).expect("cancel");
    assert!(cancelled.is_exception);
}

#[test]
fn list_in_range_filters_and_orders() {
    let db_path = setup_test_db("occurrence_list_filters");
    let pool = open_pool(&db_path);

    let a = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Late",
        datetime(2024, 11, 22, 16, 0),
        30,
        "",
    )
    .expect("create");
    OccurrenceLogic::create_standalone(
        &pool.conn,
        "Early",
        datetime(2024, 11, 20, 9, 0),
        30,
        "",
    )
    .expect("create");
    OccurrenceLogic::cancel(&pool.conn, a.id).expect("cancel");

    let all = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 12, 1, 0, 0),
        None,
    )
    .expect("list all");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].title, "Early");
    assert_eq!(all[1].title, "Late");

    let scheduled = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 12, 1, 0, 0),
        Some(OccurrenceStatus::Scheduled),
    )
    .expect("list scheduled");
    assert_eq!(scheduled.len(), 1);
    assert_eq!(scheduled[0].title, "Early");

    // The range is start-inclusive, end-exclusive.
    let edge = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 11, 20, 9, 0),
        datetime(2024, 11, 22, 16, 0),
        None,
    )
    .expect("list edge");
    assert_eq!(edge.len(), 1);
    assert_eq!(edge[0].title, "Early");
}

#[test]
fn list_rejects_inverted_range() {
    let db_path = setup_test_db("occurrence_list_inverted");
    let pool = open_pool(&db_path);

    let err = OccurrenceLogic::list_in_range(
        &pool.conn,
        datetime(2024, 12, 1, 0, 0),
        datetime(2024, 11, 1, 0, 0),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));
}

#[test]
fn update_unknown_occurrence_is_not_found() {
    let db_path = setup_test_db("occurrence_update_missing");
    let pool = open_pool(&db_path);

    let err =
        OccurrenceLogic::update(&pool.conn, 123, &OccurrenceUpdate::default()).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
