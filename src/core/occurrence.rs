//! High-level business logic for individual occurrences: standalone
//! creation, partial updates, the cancel/complete state machine, and
//! range listings.

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::occurrences;
use crate::errors::{AppError, AppResult};
use crate::models::occurrence::SessionOccurrence;
use crate::models::status::OccurrenceStatus;

/// Present fields are applied; absent fields keep their value.
#[derive(Debug, Default)]
pub struct OccurrenceUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_datetime: Option<NaiveDateTime>,
    pub duration_minutes: Option<i32>,
}

pub struct OccurrenceLogic;

impl OccurrenceLogic {
    /// Create a one-time session, not tied to any pattern.
    pub fn create_standalone(
        conn: &Connection,
        title: &str,
        start_datetime: NaiveDateTime,
        duration_minutes: i32,
        description: &str,
    ) -> AppResult<SessionOccurrence> {
        validate_duration(duration_minutes)?;

        let mut occurrence =
            SessionOccurrence::new(None, title, description, start_datetime, duration_minutes);
        occurrence.id = occurrences::insert_occurrence(conn, &occurrence)?;
        Ok(occurrence)
    }

    /// Partial update. Moving a pattern-owned row away from its template
    /// instant promotes it to an exception, shielding it from later
    /// template fan-out.
    pub fn update(
        conn: &Connection,
        id: i32,
        upd: &OccurrenceUpdate,
    ) -> AppResult<SessionOccurrence> {
        let mut occurrence = occurrences::get_occurrence(conn, id)?;

        if let Some(duration) = upd.duration_minutes {
            validate_duration(duration)?;
            occurrence.duration_minutes = duration;
        }
        if let Some(start) = upd.start_datetime {
            occurrence.start_datetime = start;
            if occurrence.pattern_id.is_some() {
                occurrence.is_exception = true;
            }
        }
        if let Some(title) = &upd.title {
            occurrence.title = title.clone();
        }
        if let Some(description) = &upd.description {
            occurrence.description = description.clone();
        }

        occurrences::update_occurrence(conn, &occurrence)?;
        Ok(occurrence)
    }

    /// `scheduled → cancelled`. Cancelled and completed are terminal.
    pub fn cancel(conn: &Connection, id: i32) -> AppResult<SessionOccurrence> {
        let mut occurrence = occurrences::get_occurrence(conn, id)?;

        match occurrence.status {
            OccurrenceStatus::Cancelled => return Err(AppError::AlreadyCancelled),
            OccurrenceStatus::Completed => return Err(AppError::AlreadyCompleted),
            OccurrenceStatus::Scheduled => {}
        }

        occurrence.status = OccurrenceStatus::Cancelled;
        if occurrence.pattern_id.is_some() {
            occurrence.is_exception = true;
        }

        occurrences::update_occurrence(conn, &occurrence)?;
        Ok(occurrence)
    }

    /// `scheduled → completed`.
    pub fn complete(conn: &Connection, id: i32) -> AppResult<SessionOccurrence> {
        let mut occurrence = occurrences::get_occurrence(conn, id)?;

        match occurrence.status {
            OccurrenceStatus::Completed => return Err(AppError::AlreadyCompleted),
            OccurrenceStatus::Cancelled => return Err(AppError::CancelledCannotComplete),
            OccurrenceStatus::Scheduled => {}
        }

        occurrence.status = OccurrenceStatus::Completed;
        occurrences::update_occurrence(conn, &occurrence)?;
        Ok(occurrence)
    }

    /// Rows with `start_datetime ∈ [start, end)`, optionally filtered by
    /// status, ordered ascending.
    pub fn list_in_range(
        conn: &Connection,
        start: NaiveDateTime,
        end: NaiveDateTime,
        status: Option<OccurrenceStatus>,
    ) -> AppResult<Vec<SessionOccurrence>> {
        if start >= end {
            return Err(AppError::InvalidRange(
                "Start datetime must be before end datetime".into(),
            ));
        }

        occurrences::load_in_range(conn, start, end, status)
    }
}

fn validate_duration(duration_minutes: i32) -> AppResult<()> {
    if duration_minutes <= 0 {
        return Err(AppError::Validation("Duration must be positive".into()));
    }
    Ok(())
}
