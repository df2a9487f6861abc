use crate::errors::{AppError, AppResult};
use crate::models::exception::SessionException;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, Result, Row, params};

pub fn map_row(row: &Row) -> Result<SessionException> {
    let date_str: String = row.get("exception_date")?;
    let modified_str: Option<String> = row.get("modified_datetime")?;

    let exception_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(date_str.clone())),
        )
    })?;

    let modified_datetime = match modified_str {
        Some(s) => Some(
            NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M").map_err(|_| {
                rusqlite::Error::FromSqlConversionFailure(
                    0,
                    rusqlite::types::Type::Text,
                    Box::new(AppError::InvalidDateTime(s.clone())),
                )
            })?,
        ),
        None => None,
    };

    Ok(SessionException {
        id: row.get("id")?,
        pattern_id: row.get("pattern_id")?,
        exception_date,
        is_cancelled: row.get::<_, i32>("is_cancelled")? == 1,
        modified_datetime,
        created_at: row.get("created_at")?,
    })
}

/// Insert or replace the override for `(pattern_id, exception_date)`.
/// A later edit to the same date supersedes the earlier one; the table
/// never holds two overrides for one instance.
pub fn upsert_exception(conn: &Connection, ex: &SessionException) -> AppResult<()> {
    conn.execute(
        "INSERT INTO exceptions (pattern_id, exception_date, is_cancelled, modified_datetime, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(pattern_id, exception_date) DO UPDATE SET
             is_cancelled = excluded.is_cancelled,
             modified_datetime = excluded.modified_datetime,
             created_at = excluded.created_at",
        params![
            ex.pattern_id,
            ex.date_str(),
            if ex.is_cancelled { 1 } else { 0 },
            ex.modified_datetime
                .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string()),
            ex.created_at,
        ],
    )?;
    Ok(())
}

/// All overrides of a pattern, ordered by date.
pub fn load_exceptions_for_pattern(
    conn: &Connection,
    pattern_id: i32,
) -> AppResult<Vec<SessionException>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM exceptions
         WHERE pattern_id = ?1
         ORDER BY exception_date ASC",
    )?;

    let rows = stmt.query_map([pattern_id], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
