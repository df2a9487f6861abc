#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rsessionbook::core::generate::Horizon;
use rsessionbook::core::pattern::PatternLogic;
use rsessionbook::db::pool::DbPool;
use rsessionbook::models::pattern::RecurrencePattern;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rsb() -> Command {
    cargo_bin_cmd!("rsessionbook")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rsessionbook.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the database schema via the CLI
pub fn init_db(db_path: &str) {
    rsb()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Open the test database through the library API, schema guaranteed
pub fn open_pool(db_path: &str) -> DbPool {
    let pool = DbPool::new(db_path).expect("open db");
    rsessionbook::db::initialize::init_db(&pool.conn).expect("init db");
    pool
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn datetime(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, min, 0).expect("valid datetime")
}

pub fn time(h: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, min, 0).expect("valid time")
}

/// The Monday-10:00 November 2024 pattern used across tests.
/// Bounded by an end date so horizon-based generation is deterministic.
pub fn monday_coaching_pattern(
    pool: &mut DbPool,
    generate: Option<Horizon>,
) -> (RecurrencePattern, usize) {
    PatternLogic::create(
        &mut pool.conn,
        "Weekly Coaching",
        0,
        time(10, 0),
        date(2024, 11, 4),
        60,
        "Monday morning coaching session",
        Some(date(2024, 11, 30)),
        generate,
    )
    .expect("create pattern")
}
