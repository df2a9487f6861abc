use crate::db::pool::DbPool;
use rusqlite::OptionalExtension;
use std::fs;

const RESET: &str = "\x1b[0m";
const CYAN: &str = "\x1b[36m";
const GREEN: &str = "\x1b[32m";
const GREY: &str = "\x1b[90m";
const YELLOW: &str = "\x1b[33m";

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    let patterns: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM patterns", [], |row| row.get(0))?;
    let occurrences: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM occurrences", [], |row| row.get(0))?;
    let exceptions: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM exceptions", [], |row| row.get(0))?;

    println!(
        "{}• Patterns:{} {}{}{}",
        CYAN, RESET, GREEN, patterns, RESET
    );
    println!(
        "{}• Occurrences:{} {}{}{}",
        CYAN, RESET, GREEN, occurrences, RESET
    );
    println!(
        "{}• Exceptions:{} {}{}{}",
        CYAN, RESET, GREEN, exceptions, RESET
    );

    //
    // 3) OCCURRENCE RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row(
            "SELECT start_datetime FROM occurrences ORDER BY start_datetime ASC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT start_datetime FROM occurrences ORDER BY start_datetime DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match (first, last) {
        (Some(f), Some(l)) => {
            println!("{}• Range:{} {} → {}", CYAN, RESET, f, l);
        }
        _ => {
            println!("{}• Range:{} {}empty{}", CYAN, RESET, GREY, RESET);
        }
    }

    println!();
    Ok(())
}
