use crate::errors::{AppError, AppResult};
use crate::models::occurrence::SessionOccurrence;
use crate::models::status::OccurrenceStatus;
use chrono::{NaiveDateTime, NaiveTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn fmt_dt(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

pub fn map_row(row: &Row) -> Result<SessionOccurrence> {
    let start_str: String = row.get("start_datetime")?;
    let status_str: String = row.get("status")?;

    let start_datetime =
        NaiveDateTime::parse_from_str(&start_str, "%Y-%m-%d %H:%M").map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidDateTime(start_str.clone())),
            )
        })?;

    let status = OccurrenceStatus::from_db_str(&status_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidStatus(status_str.clone())),
        )
    })?;

    Ok(SessionOccurrence {
        id: row.get("id")?,
        pattern_id: row.get("pattern_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        start_datetime,
        duration_minutes: row.get("duration_minutes")?,
        status,
        is_exception: row.get::<_, i32>("is_exception")? == 1,
        created_at: row.get("created_at")?,
    })
}

pub fn insert_occurrence(conn: &Connection, o: &SessionOccurrence) -> AppResult<i32> {
    conn.execute(
        "INSERT INTO occurrences (pattern_id, title, description, start_datetime, duration_minutes, status, is_exception, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            o.pattern_id,
            o.title,
            o.description,
            o.start_str(),
            o.duration_minutes,
            o.status.to_db_str(),
            if o.is_exception { 1 } else { 0 },
            o.created_at,
        ],
    )?;
    Ok(conn.last_insert_rowid() as i32)
}

/// Existence check keyed on `(pattern_id, start_datetime)`: the guard
/// that keeps regeneration idempotent.
pub fn occurrence_exists(
    conn: &Connection,
    pattern_id: i32,
    start_datetime: NaiveDateTime,
) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached(
        "SELECT 1 FROM occurrences WHERE pattern_id = ?1 AND start_datetime = ?2 LIMIT 1",
    )?;
    let exists = stmt.exists(params![pattern_id, fmt_dt(start_datetime)])?;
    Ok(exists)
}

/// The materialized row of a pattern on a calendar date, if one exists.
pub fn find_for_pattern_on_date(
    conn: &Connection,
    pattern_id: i32,
    date: chrono::NaiveDate,
) -> AppResult<Option<SessionOccurrence>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM occurrences
         WHERE pattern_id = ?1 AND substr(start_datetime, 1, 10) = ?2
         LIMIT 1",
    )?;
    let row = stmt
        .query_row(
            params![pattern_id, date.format("%Y-%m-%d").to_string()],
            map_row,
        )
        .optional()?;
    Ok(row)
}

pub fn get_occurrence(conn: &Connection, id: i32) -> AppResult<SessionOccurrence> {
    let mut stmt = conn.prepare("SELECT * FROM occurrences WHERE id = ?1")?;
    stmt.query_row([id], map_row)
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("occurrence {}", id)))
}

/// Rows with `start_datetime ∈ [start, end)`, optionally filtered by
/// status, ordered ascending.
pub fn load_in_range(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
    status: Option<OccurrenceStatus>,
) -> AppResult<Vec<SessionOccurrence>> {
    let mut out = Vec::new();

    if let Some(st) = status {
        let mut stmt = conn.prepare(
            "SELECT * FROM occurrences
             WHERE start_datetime >= ?1 AND start_datetime < ?2 AND status = ?3
             ORDER BY start_datetime ASC",
        )?;
        let rows = stmt.query_map(params![fmt_dt(start), fmt_dt(end), st.to_db_str()], map_row)?;
        for r in rows {
            out.push(r?);
        }
    } else {
        let mut stmt = conn.prepare(
            "SELECT * FROM occurrences
             WHERE start_datetime >= ?1 AND start_datetime < ?2
             ORDER BY start_datetime ASC",
        )?;
        let rows = stmt.query_map(params![fmt_dt(start), fmt_dt(end)], map_row)?;
        for r in rows {
            out.push(r?);
        }
    }

    Ok(out)
}

/// Standalone (one-time) rows in `[start, end)`, ordered ascending.
pub fn load_standalone_in_range(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> AppResult<Vec<SessionOccurrence>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM occurrences
         WHERE pattern_id IS NULL
           AND start_datetime >= ?1 AND start_datetime < ?2
         ORDER BY start_datetime ASC",
    )?;

    let rows = stmt.query_map(params![fmt_dt(start), fmt_dt(end)], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Update an occurrence (all fields except id).
pub fn update_occurrence(conn: &Connection, o: &SessionOccurrence) -> AppResult<()> {
    conn.execute(
        "UPDATE occurrences
         SET pattern_id = ?1, title = ?2, description = ?3,
             start_datetime = ?4, duration_minutes = ?5,
             status = ?6, is_exception = ?7, created_at = ?8
         WHERE id = ?9",
        params![
            o.pattern_id,
            o.title,
            o.description,
            o.start_str(),
            o.duration_minutes,
            o.status.to_db_str(),
            if o.is_exception { 1 } else { 0 },
            o.created_at,
            o.id,
        ],
    )?;
    Ok(())
}

/// Fields a template edit fans out to materialized rows.
#[derive(Debug, Default)]
pub struct FutureRewrite {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_minutes: Option<i32>,
    pub time_of_day: Option<NaiveTime>,
}

impl FutureRewrite {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.duration_minutes.is_none()
            && self.time_of_day.is_none()
    }
}

/// Rewrite future, non-exception, scheduled rows of a pattern to match an
/// updated template. Rows already edited away from the template (and past
/// rows) are left untouched. Returns the number of affected rows.
pub fn rewrite_future_for_pattern(
    conn: &Connection,
    pattern_id: i32,
    from: NaiveDateTime,
    rw: &FutureRewrite,
) -> AppResult<usize> {
    if rw.is_empty() {
        return Ok(0);
    }

    const SCOPE: &str =
        "pattern_id = ?2 AND start_datetime >= ?3 AND is_exception = 0 AND status = 'scheduled'";

    let mut affected = 0usize;

    if let Some(title) = &rw.title {
        affected = affected.max(conn.execute(
            &format!("UPDATE occurrences SET title = ?1 WHERE {}", SCOPE),
            params![title, pattern_id, fmt_dt(from)],
        )?);
    }

    if let Some(description) = &rw.description {
        affected = affected.max(conn.execute(
            &format!("UPDATE occurrences SET description = ?1 WHERE {}", SCOPE),
            params![description, pattern_id, fmt_dt(from)],
        )?);
    }

    if let Some(duration) = rw.duration_minutes {
        affected = affected.max(conn.execute(
            &format!("UPDATE occurrences SET duration_minutes = ?1 WHERE {}", SCOPE),
            params![duration, pattern_id, fmt_dt(from)],
        )?);
    }

    if let Some(time) = rw.time_of_day {
        // Keep the date part, replace the time-of-day part.
        affected = affected.max(conn.execute(
            &format!(
                "UPDATE occurrences
                 SET start_datetime = substr(start_datetime, 1, 10) || ' ' || ?1
                 WHERE {}",
                SCOPE
            ),
            params![time.format("%H:%M").to_string(), pattern_id, fmt_dt(from)],
        )?);
    }

    Ok(affected)
}

/// Delete future rows of a pattern (cascade deletion). Returns the count.
pub fn delete_future_for_pattern(
    conn: &Connection,
    pattern_id: i32,
    from: NaiveDateTime,
) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM occurrences WHERE pattern_id = ?1 AND start_datetime >= ?2",
        params![pattern_id, fmt_dt(from)],
    )?;
    Ok(n)
}
