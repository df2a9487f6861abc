use crate::errors::{AppError, AppResult};
use crate::models::pattern::RecurrencePattern;
use crate::models::weekday::Weekday;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

pub fn map_row(row: &Row) -> Result<RecurrencePattern> {
    let time_str: String = row.get("time_of_day")?;
    let start_str: String = row.get("start_date")?;
    let end_str: Option<String> = row.get("end_date")?;

    let time_of_day = NaiveTime::parse_from_str(&time_str, "%H:%M").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTime(time_str.clone())),
        )
    })?;

    let start_date = NaiveDate::parse_from_str(&start_str, "%Y-%m-%d").map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidDate(start_str.clone())),
        )
    })?;

    let end_date = match end_str {
        Some(s) => Some(NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidDate(s.clone())),
            )
        })?),
        None => None,
    };

    let weekday_idx: i64 = row.get("weekday")?;
    let weekday = Weekday::from_index(weekday_idx).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(AppError::InvalidWeekday(weekday_idx.to_string())),
        )
    })?;

    Ok(RecurrencePattern {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        weekday,
        time_of_day,
        duration_minutes: row.get("duration_minutes")?,
        start_date,
        end_date,
        is_active: row.get::<_, i32>("is_active")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_pattern(conn: &Connection, p: &RecurrencePattern) -> AppResult<i32> {
    conn.execute(
        "INSERT INTO patterns (title, description, weekday, time_of_day, duration_minutes, start_date, end_date, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            p.title,
            p.description,
            p.weekday.index(),
            p.time_str(),
            p.duration_minutes,
            p.start_str(),
            p.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            if p.is_active { 1 } else { 0 },
            p.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid() as i32)
}

pub fn get_pattern(conn: &Connection, id: i32) -> AppResult<RecurrencePattern> {
    let mut stmt = conn.prepare("SELECT * FROM patterns WHERE id = ?1")?;
    stmt.query_row([id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("pattern {}", id)))
}

/// All patterns, optionally only the active ones, ordered by id.
pub fn load_patterns(conn: &Connection, only_active: bool) -> AppResult<Vec<RecurrencePattern>> {
    let sql = if only_active {
        "SELECT * FROM patterns WHERE is_active = 1 ORDER BY id ASC"
    } else {
        "SELECT * FROM patterns ORDER BY id ASC"
    };
    let mut stmt = conn.prepare(sql)?;

    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Update a pattern (all fields except id).
pub fn update_pattern(conn: &Connection, p: &RecurrencePattern) -> AppResult<()> {
    conn.execute(
        "UPDATE patterns
         SET title = ?1, description = ?2, weekday = ?3,
             time_of_day = ?4, duration_minutes = ?5,
             start_date = ?6, end_date = ?7,
             is_active = ?8, created_at = ?9
         WHERE id = ?10",
        params![
            p.title,
            p.description,
            p.weekday.index(),
            p.time_str(),
            p.duration_minutes,
            p.start_str(),
            p.end_date.map(|d| d.format("%Y-%m-%d").to_string()),
            if p.is_active { 1 } else { 0 },
            p.created_at,
            p.id,
        ],
    )?;
    Ok(())
}

/// Delete a pattern. Exceptions and occurrences follow via FK cascade.
pub fn delete_pattern(conn: &Connection, id: i32) -> AppResult<()> {
    conn.execute("DELETE FROM patterns WHERE id = ?1", [id])?;
    Ok(())
}
