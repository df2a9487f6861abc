//! Date-keyed instance overrides: cancel or reschedule one occurrence of
//! a pattern without touching the rest of the series.
//!
//! The target date must actually name an instance: it has to fall on the
//! pattern's weekday and on/after its start date. The store upserts on
//! `(pattern_id, exception_date)`, so editing the same date twice
//! replaces the earlier override. When the instance has already been
//! materialized as a row, the row is patched in the same transaction, so
//! both resolver modes observe the override.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;

use crate::db::{exceptions, occurrences, patterns};
use crate::errors::{AppError, AppResult};
use crate::models::exception::SessionException;
use crate::models::pattern::RecurrencePattern;
use crate::models::status::OccurrenceStatus;
use crate::utils::date::weekday_index;

pub struct ExceptionLogic;

impl ExceptionLogic {
    /// Cancel the instance on `date`.
    pub fn cancel_date(
        conn: &mut Connection,
        pattern_id: i32,
        date: NaiveDate,
    ) -> AppResult<SessionException> {
        let pattern = patterns::get_pattern(conn, pattern_id)?;
        Self::check_occurrence_date(&pattern, date)?;

        let ex = SessionException::cancellation(pattern_id, date);
        ex.validate()?;

        let tx = conn.transaction()?;
        exceptions::upsert_exception(&tx, &ex)?;

        if let Some(mut row) = occurrences::find_for_pattern_on_date(&tx, pattern_id, date)? {
            row.status = OccurrenceStatus::Cancelled;
            row.is_exception = true;
            occurrences::update_occurrence(&tx, &row)?;
        }
        tx.commit()?;

        Ok(ex)
    }

    /// Move the instance on `date` to `new_datetime`. A reschedule
    /// replaces any earlier override for the date, including a
    /// cancellation: the instance is live again at the new instant.
    pub fn reschedule_date(
        conn: &mut Connection,
        pattern_id: i32,
        date: NaiveDate,
        new_datetime: NaiveDateTime,
    ) -> AppResult<SessionException> {
        let pattern = patterns::get_pattern(conn, pattern_id)?;
        Self::check_occurrence_date(&pattern, date)?;

        let ex = SessionException::reschedule(pattern_id, date, new_datetime);
        ex.validate()?;

        let tx = conn.transaction()?;
        exceptions::upsert_exception(&tx, &ex)?;

        if let Some(mut row) = occurrences::find_for_pattern_on_date(&tx, pattern_id, date)? {
            row.start_datetime = new_datetime;
            row.status = OccurrenceStatus::Scheduled;
            row.is_exception = true;
            occurrences::update_occurrence(&tx, &row)?;
        }
        tx.commit()?;

        Ok(ex)
    }

    fn check_occurrence_date(pattern: &RecurrencePattern, date: NaiveDate) -> AppResult<()> {
        if weekday_index(date) != pattern.weekday.index() {
            return Err(AppError::InvalidOccurrenceDate(format!(
                "{} does not fall on {}",
                date,
                pattern.weekday.name()
            )));
        }
        if date < pattern.start_date {
            return Err(AppError::InvalidOccurrenceDate(format!(
                "{} is before the pattern start date {}",
                date,
                pattern.start_str()
            )));
        }
        Ok(())
    }
}
