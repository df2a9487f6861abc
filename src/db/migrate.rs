use crate::errors::AppResult;
use crate::ui::messages::warning;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `patterns` table with the modern schema.
fn create_patterns_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS patterns (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            title            TEXT NOT NULL,
            description      TEXT NOT NULL DEFAULT '',
            weekday          INTEGER NOT NULL CHECK(weekday BETWEEN 0 AND 6),
            time_of_day      TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK(duration_minutes > 0),
            start_date       TEXT NOT NULL,
            end_date         TEXT,
            is_active        INTEGER NOT NULL DEFAULT 1,
            created_at       TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_patterns_weekday ON patterns(weekday, is_active);
        "#,
    )?;
    Ok(())
}

/// Create the `exceptions` table. The UNIQUE key makes per-date overrides
/// upsert instead of accumulate.
fn create_exceptions_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS exceptions (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            pattern_id        INTEGER NOT NULL REFERENCES patterns(id) ON DELETE CASCADE,
            exception_date    TEXT NOT NULL,
            is_cancelled      INTEGER NOT NULL DEFAULT 0,
            modified_datetime TEXT,
            created_at        TEXT NOT NULL,
            UNIQUE(pattern_id, exception_date)
        );
        "#,
    )?;
    Ok(())
}

/// Create the `occurrences` table. The UNIQUE key keeps regeneration
/// idempotent for pattern-owned rows; standalone rows (NULL pattern_id)
/// are not constrained by it.
fn create_occurrences_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS occurrences (
            id               INTEGER PRIMARY KEY AUTOINCREMENT,
            pattern_id       INTEGER REFERENCES patterns(id) ON DELETE CASCADE,
            title            TEXT NOT NULL,
            description      TEXT NOT NULL DEFAULT '',
            start_datetime   TEXT NOT NULL,
            duration_minutes INTEGER NOT NULL CHECK(duration_minutes > 0),
            status           TEXT NOT NULL DEFAULT 'scheduled'
                             CHECK(status IN ('scheduled','cancelled','completed')),
            is_exception     INTEGER NOT NULL DEFAULT 0,
            created_at       TEXT NOT NULL,
            UNIQUE(pattern_id, start_datetime)
        );

        CREATE INDEX IF NOT EXISTS idx_occurrences_start ON occurrences(start_datetime);
        CREATE INDEX IF NOT EXISTS idx_occurrences_status ON occurrences(status, start_datetime);
        "#,
    )?;
    Ok(())
}

/// Migrate an old `patterns` table to include the `is_active` column.
/// Early schemas deleted patterns outright; deactivation came later.
fn migrate_add_is_active_to_patterns(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "patterns")? {
        return Ok(());
    }

    if table_has_column(conn, "patterns", "is_active")? {
        return Ok(());
    }

    warning("Adding 'is_active' column to patterns table...");

    conn.execute_batch(
        r#"
        ALTER TABLE patterns ADD COLUMN is_active INTEGER NOT NULL DEFAULT 1;
        "#,
    )?;

    Ok(())
}

/// Migrate an old `occurrences` table to include the `is_exception`
/// column marking rows edited away from their template.
fn migrate_add_is_exception_to_occurrences(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "occurrences")? {
        return Ok(());
    }

    if table_has_column(conn, "occurrences", "is_exception")? {
        return Ok(());
    }

    warning("Adding 'is_exception' column to occurrences table...");

    conn.execute_batch(
        r#"
        ALTER TABLE occurrences ADD COLUMN is_exception INTEGER NOT NULL DEFAULT 0;
        "#,
    )?;

    Ok(())
}

/// Run all pending migrations, oldest first. Safe to call repeatedly.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    ensure_log_table(conn)?;

    migrate_add_is_active_to_patterns(conn)?;
    migrate_add_is_exception_to_occurrences(conn)?;

    create_patterns_table(conn)?;
    create_exceptions_table(conn)?;
    create_occurrences_table(conn)?;

    Ok(())
}
