//! End-to-end coverage of the occurrence resolution engine: weekly
//! expansion, exception overlay, window boundaries, and both resolver
//! modes.

mod common;
use common::{date, datetime, monday_coaching_pattern, open_pool, setup_test_db, time};

use chrono::Datelike;
use rsessionbook::core::exception::ExceptionLogic;
use rsessionbook::core::generate::Horizon;
use rsessionbook::core::occurrence::{OccurrenceLogic, OccurrenceUpdate};
use rsessionbook::core::pattern::{PatternLogic, PatternUpdate};
use rsessionbook::core::resolver::{Resolver, ResolverMode};
use rsessionbook::errors::AppError;

#[test]
fn november_mondays_resolve_to_four_instances() {
    let db_path = setup_test_db("resolver_four_mondays");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");

    assert_eq!(feed.len(), 4);
    let days: Vec<u32> = feed.iter().map(|r| r.occurrence_date.day()).collect();
    assert_eq!(days, vec![4, 11, 18, 25]);

    for r in &feed {
        assert_eq!(r.occurrence_date.weekday(), chrono::Weekday::Mon);
        assert_eq!(r.start_datetime.time(), time(10, 0));
        assert_eq!(r.pattern_id, Some(pattern.id));
        assert!(!r.is_modified);
    }
}

#[test]
fn cancelled_date_disappears_from_feed() {
    let db_path = setup_test_db("resolver_cancelled_date");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    ExceptionLogic::cancel_date(&mut pool.conn, pattern.id, date(2024, 11, 18))
        .expect("cancel date");

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");

    assert_eq!(feed.len(), 3);
    assert!(feed.iter().all(|r| r.occurrence_date.day() != 18));
}

#[test]
fn rescheduled_date_moves_and_is_flagged() {
    let db_path = setup_test_db("resolver_rescheduled_date");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    ExceptionLogic::reschedule_date(
        &mut pool.conn,
        pattern.id,
        date(2024, 11, 25),
        datetime(2024, 11, 25, 11, 0),
    )
    .expect("reschedule date");

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");

    assert_eq!(feed.len(), 4);
    for r in &feed {
        if r.occurrence_date.day() == 25 {
            assert_eq!(r.start_datetime, datetime(2024, 11, 25, 11, 0));
            assert!(r.is_modified);
        } else {
            assert_eq!(r.start_datetime.time(), time(10, 0));
            assert!(!r.is_modified);
        }
    }
}

#[test]
fn template_time_update_shifts_everything_but_exceptions() {
    let db_path = setup_test_db("resolver_template_shift");
    let mut pool = open_pool(&db_path);
    let (pattern, _) = monday_coaching_pattern(&mut pool, None);

    ExceptionLogic::cancel_date(&mut pool.conn, pattern.id, date(2024, 11, 18))
        .expect("cancel date");
    ExceptionLogic::reschedule_date(
        &mut pool.conn,
        pattern.id,
        date(2024, 11, 25),
        datetime(2024, 11, 25, 11, 0),
    )
    .expect("reschedule date");

    let upd = PatternUpdate {
        time_of_day: Some(time(9, 0)),
        ..Default::default()
    };
    PatternLogic::update(&mut pool.conn, pattern.id, &upd, true).expect("update pattern");

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");

    assert_eq!(feed.len(), 3);
    for r in &feed {
        match r.occurrence_date.day() {
            25 => {
                // The per-date override is pinned; the template edit
                // must not reach it.
                assert_eq!(r.start_datetime, datetime(2024, 11, 25, 11, 0));
                assert!(r.is_modified);
            }
            4 | 11 => assert_eq!(r.start_datetime.time(), time(9, 0)),
            other => panic!("unexpected occurrence on day {}", other),
        }
    }
}

#[test]
fn window_boundaries_clip_the_series() {
    let db_path = setup_test_db("resolver_window_clip");
    let mut pool = open_pool(&db_path);
    monday_coaching_pattern(&mut pool, None);

    // One week window: only the 18th falls inside.
    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 12, 0, 0),
        datetime(2024, 11, 19, 0, 0),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].occurrence_date, date(2024, 11, 18));

    // The end boundary is exclusive on the instant.
    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 4, 0, 0),
        datetime(2024, 11, 4, 10, 0),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert!(feed.is_empty());
}

#[test]
fn pattern_outside_window_yields_nothing() {
    let db_path = setup_test_db("resolver_outside_window");
    let mut pool = open_pool(&db_path);
    monday_coaching_pattern(&mut pool, None);

    // Entirely before the pattern starts.
    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 10, 1, 0, 0),
        datetime(2024, 10, 31, 0, 0),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert!(feed.is_empty());

    // Entirely after the pattern ends.
    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 12, 1, 0, 0),
        datetime(2024, 12, 31, 0, 0),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert!(feed.is_empty());
}

#[test]
fn standalone_sessions_merge_into_the_feed() {
    let db_path = setup_test_db("resolver_standalone");
    let mut pool = open_pool(&db_path);
    monday_coaching_pattern(&mut pool, None);

    let one_off = OccurrenceLogic::create_standalone(
        &pool.conn,
        "Intro Call",
        datetime(2024, 11, 20, 15, 0),
        45,
        "",
    )
    .expect("create standalone");

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");

    assert_eq!(feed.len(), 5);
    let entry = feed
        .iter()
        .find(|r| r.occurrence_id == Some(one_off.id))
        .expect("standalone in feed");
    assert_eq!(entry.pattern_id, None);
    assert_eq!(entry.start_datetime, datetime(2024, 11, 20, 15, 0));

    // Feed is ordered by instant: the one-off lands between the 18th
    // and the 25th.
    let instants: Vec<_> = feed.iter().map(|r| r.start_datetime).collect();
    let mut sorted = instants.clone();
    sorted.sort();
    assert_eq!(instants, sorted);

    // A cancelled standalone drops out.
    OccurrenceLogic::cancel(&pool.conn, one_off.id).expect("cancel standalone");
    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Virtual,
    )
    .expect("resolve");
    assert_eq!(feed.len(), 4);
}

#[test]
fn materialized_mode_reads_rows() {
    let db_path = setup_test_db("resolver_materialized");
    let mut pool = open_pool(&db_path);
    let (_, created) = monday_coaching_pattern(&mut pool, Some(Horizon::Months(3)));
    assert_eq!(created, 4);

    let window = (
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
    );

    let feed = Resolver::resolve(&pool.conn, window.0, window.1, ResolverMode::Materialized)
        .expect("resolve");
    assert_eq!(feed.len(), 4);
    assert!(feed.iter().all(|r| r.occurrence_id.is_some()));

    // Cancelling one row removes it from the feed; editing another
    // marks it modified.
    let rows = OccurrenceLogic::list_in_range(&pool.conn, window.0, window.1, None).expect("list");
    OccurrenceLogic::cancel(&pool.conn, rows[2].id).expect("cancel row");
    let upd = OccurrenceUpdate {
        start_datetime: Some(datetime(2024, 11, 25, 11, 0)),
        ..Default::default()
    };
    OccurrenceLogic::update(&pool.conn, rows[3].id, &upd).expect("move row");

    let feed = Resolver::resolve(&pool.conn, window.0, window.1, ResolverMode::Materialized)
        .expect("resolve");
    assert_eq!(feed.len(), 3);
    let moved = feed
        .iter()
        .find(|r| r.occurrence_id == Some(rows[3].id))
        .expect("moved row in feed");
    assert!(moved.is_modified);
    assert_eq!(moved.start_datetime, datetime(2024, 11, 25, 11, 0));
}

#[test]
fn date_keyed_override_patches_materialized_rows_too() {
    let db_path = setup_test_db("resolver_override_patches_rows");
    let mut pool = open_pool(&db_path);
    let (pattern, created) = monday_coaching_pattern(&mut pool, Some(Horizon::Months(3)));
    assert_eq!(created, 4);

    ExceptionLogic::cancel_date(&mut pool.conn, pattern.id, date(2024, 11, 18))
        .expect("cancel date");

    let feed = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 1, 0, 0),
        datetime(2024, 11, 30, 23, 59),
        ResolverMode::Materialized,
    )
    .expect("resolve");
    assert_eq!(feed.len(), 3);
    assert!(feed.iter().all(|r| r.occurrence_date.day() != 18));
}

#[test]
fn inverted_window_is_rejected() {
    let db_path = setup_test_db("resolver_inverted_window");
    let pool = open_pool(&db_path);

    let err = Resolver::resolve(
        &pool.conn,
        datetime(2024, 11, 30, 0, 0),
        datetime(2024, 11, 1, 0, 0),
        ResolverMode::Virtual,
    )
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidRange(_)));
}
