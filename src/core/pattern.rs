//! High-level business logic for recurrence patterns: creation with
//! optional bulk generation, template updates with fan-out, and the
//! deactivate-vs-cascade-delete split.

use chrono::{Local, NaiveDate, NaiveTime};
use rusqlite::Connection;

use crate::core::generate::{GenerateLogic, Horizon};
use crate::db::occurrences::{self, FutureRewrite};
use crate::db::patterns;
use crate::errors::{AppError, AppResult};
use crate::models::pattern::RecurrencePattern;
use crate::models::weekday::Weekday;

/// Present fields are applied; absent fields keep their value.
#[derive(Debug, Default)]
pub struct PatternUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub time_of_day: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

pub struct PatternLogic;

impl PatternLogic {
    /// Create a pattern, optionally materializing its occurrences up to a
    /// horizon in the same transaction. Returns the stored pattern and
    /// the number of occurrences created.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        conn: &mut Connection,
        title: &str,
        weekday: i64,
        time_of_day: NaiveTime,
        start_date: NaiveDate,
        duration_minutes: i32,
        description: &str,
        end_date: Option<NaiveDate>,
        generate: Option<Horizon>,
    ) -> AppResult<(RecurrencePattern, usize)> {
        let weekday = Weekday::from_index(weekday).ok_or_else(|| {
            AppError::Validation("Weekday must be between 0 (Monday) and 6 (Sunday)".into())
        })?;

        let mut pattern = RecurrencePattern::new(
            title,
            description,
            weekday,
            time_of_day,
            duration_minutes,
            start_date,
            end_date,
        );
        pattern.validate()?;

        let tx = conn.transaction()?;
        pattern.id = patterns::insert_pattern(&tx, &pattern)?;

        let created = match generate {
            Some(horizon) => GenerateLogic::generate_for_pattern(&tx, &pattern, horizon)?.len(),
            None => 0,
        };
        tx.commit()?;

        Ok((pattern, created))
    }

    /// Apply a partial update to the template. With `propagate`, future
    /// non-exception scheduled occurrences are rewritten to match; rows
    /// already edited individually keep their values. Returns the updated
    /// pattern and the number of rewritten rows.
    pub fn update(
        conn: &mut Connection,
        id: i32,
        upd: &PatternUpdate,
        propagate: bool,
    ) -> AppResult<(RecurrencePattern, usize)> {
        let mut pattern = patterns::get_pattern(conn, id)?;

        if let Some(title) = &upd.title {
            pattern.title = title.clone();
        }
        if let Some(description) = &upd.description {
            pattern.description = description.clone();
        }
        if let Some(time_of_day) = upd.time_of_day {
            pattern.time_of_day = time_of_day;
        }
        if let Some(duration) = upd.duration_minutes {
            pattern.duration_minutes = duration;
        }
        if let Some(end_date) = upd.end_date {
            pattern.end_date = Some(end_date);
        }
        if let Some(is_active) = upd.is_active {
            pattern.is_active = is_active;
        }
        pattern.validate()?;

        let tx = conn.transaction()?;
        patterns::update_pattern(&tx, &pattern)?;

        let rewritten = if propagate {
            let rewrite = FutureRewrite {
                title: upd.title.clone(),
                description: upd.description.clone(),
                duration_minutes: upd.duration_minutes,
                time_of_day: upd.time_of_day,
            };
            occurrences::rewrite_future_for_pattern(
                &tx,
                id,
                Local::now().naive_local(),
                &rewrite,
            )?
        } else {
            0
        };
        tx.commit()?;

        Ok((pattern, rewritten))
    }

    /// Deactivate the pattern, preserving history.
    pub fn deactivate(conn: &Connection, id: i32) -> AppResult<RecurrencePattern> {
        let mut pattern = patterns::get_pattern(conn, id)?;
        pattern.is_active = false;
        patterns::update_pattern(conn, &pattern)?;
        Ok(pattern)
    }

    /// Delete the pattern and its future occurrences in one transaction;
    /// remaining rows and exceptions follow via FK cascade. With
    /// `cascade = false` this is a deactivation instead. Returns the
    /// number of future occurrences removed.
    pub fn delete(conn: &mut Connection, id: i32, cascade: bool) -> AppResult<usize> {
        if !cascade {
            Self::deactivate(conn, id)?;
            return Ok(0);
        }

        // Existence check up front so a bad id is NotFound, not a no-op.
        patterns::get_pattern(conn, id)?;

        let tx = conn.transaction()?;
        let removed =
            occurrences::delete_future_for_pattern(&tx, id, Local::now().naive_local())?;
        patterns::delete_pattern(&tx, id)?;
        tx.commit()?;

        Ok(removed)
    }
}
