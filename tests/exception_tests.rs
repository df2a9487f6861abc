mod common;
use common::{date, datetime, monday_coaching_pattern, open_pool, setup_test_db};

use rsessionbook::core::exception::ExceptionLogic;
use rsessionbook::core::resolver::{Resolver, ResolverMode};
use rsessionbook::errors::AppError;
use rsessionbook::models::exception::SessionException;

#[test]
fn off_weekday_date_is_rejected() {
    let db_path = setup_test_db("exception_off_weekday");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    // 2024-11-05 is a Tuesday.
    let err =
        ExceptionLogic::cancel_date(&mut pool.conn, pattern.id, date(2024, 11, 5)).unwrap_err();
    assert!(matches!(err, AppError::InvalidOccurrenceDate(_)));
    assert!(err.to_string().contains("does not fall on Monday"));
}

#[test]
fn date_before_pattern_start_is_rejected() {
    let db_path = setup_test_db("exception_before_start");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    // A Monday, but one week before the pattern starts.
    let err = ExceptionLogic::reschedule_date(
        &mut pool.conn,
        pattern.id,
        date(2024, 10, 28),
        datetime(2024, 10, 28, 11, 0),
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidOccurrenceDate(_)));
    assert!(err.to_string().contains("before the pattern start date"));
}

#[test]
fn unknown_pattern_is_not_found() {
    let db_path = setup_test_db("exception_unknown_pattern");
    let mut pool = open_pool(&db_path);

    let err = ExceptionLogic::cancel_date(&mut pool.conn, 7, date(2024, 11, 4)).unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[test]
fn later_override_replaces_earlier_one() {
    let db_path = setup_test_db("exception_upsert_replaces");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    ExceptionLogic::cancel_date(&mut pool.conn, pattern.id, date(2024, 11, 18))
        .expect("cancel date");
    ExceptionLogic::reschedule_date(
        &mut pool.conn,
        pattern.id,
        date(2024, 11, 18),
        datetime(2024, 11, 18, 12, 0),
    )
    .expect("reschedule same date");

    // One override per date, never two.
    let count: i64 = pool
        .conn
        .query_row(
            "SELECT COUNT(*) FROM exceptions WHERE pattern_id = ?1",
            [pattern.id],
            |row| row.get(0),
        )
        .expect("count");
    assert_eq!(count, 1);

    // The reschedule wins: the instance is live again at the new time.
    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert_eq!(feed.len(), 4);
    let moved = feed
        .iter()
        .find(|r| r.occurrence_date == date(2024, 11, 18))
        .expect("18th in feed");
    assert_eq!(moved.start_datetime, datetime(2024, 11, 18, 12, 0));
    assert!(moved.is_modified);
}

#[test]
fn exception_fields_are_mutually_exclusive() {
    let both = SessionException {
        modified_datetime: Some(datetime(2024, 11, 18, 12, 0)),
        ..SessionException::cancellation(1, date(2024, 11, 18))
    };
    let err = both.validate().unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let neither = SessionException {
        is_cancelled: false,
        ..SessionException::cancellation(1, date(2024, 11, 18))
    };
    let err = neither.validate().unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn exception_on_never_generated_date_is_inert() {
    let db_path = setup_test_db("exception_inert");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    // Valid Monday after the series end date: accepted by the guard but
    // never looked up, since no candidate date reaches it.
    ExceptionLogic::cancel_date(&mut pool.conn, pattern.id, date(2024, 12, 2))
        .expect("cancel date");

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 12, 31, 0, 0),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert_eq!(feed.len(), 4);
}
