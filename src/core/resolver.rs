//! Occurrence resolution engine.
//!
//! Turns recurrence patterns (plus their per-date exceptions) and
//! standalone rows into the concrete, time-ordered list of bookable
//! instances inside a window `[start, end)`. Two operating modes share
//! this entry point:
//!
//! - `Virtual`: expand patterns on every read, overlaying exceptions.
//!   Nothing is stored per instance until an instance is edited.
//! - `Materialized`: read pre-generated occurrence rows (see
//!   `core::generate`), where per-instance edits live on the rows
//!   themselves.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use rusqlite::Connection;

use crate::db::{exceptions, occurrences, patterns};
use crate::errors::{AppError, AppResult};
use crate::models::pattern::RecurrencePattern;
use crate::models::resolved::ResolvedOccurrence;
use crate::utils::date::aligned_dates;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverMode {
    Virtual,
    Materialized,
}

impl ResolverMode {
    pub fn rm_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "virtual" => Some(Self::Virtual),
            "materialized" => Some(Self::Materialized),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Virtual => "virtual",
            Self::Materialized => "materialized",
        }
    }
}

pub struct Resolver;

impl Resolver {
    /// Resolve all bookable instances with effective instant in
    /// `[start, end)`, merged across every active pattern and the
    /// standalone sessions, ascending. Cancelled instances never appear.
    pub fn resolve(
        conn: &Connection,
        start: NaiveDateTime,
        end: NaiveDateTime,
        mode: ResolverMode,
    ) -> AppResult<Vec<ResolvedOccurrence>> {
        if start >= end {
            return Err(AppError::InvalidRange(
                "Start datetime must be before end datetime".into(),
            ));
        }

        let mut out = match mode {
            ResolverMode::Virtual => Self::resolve_virtual(conn, start, end)?,
            ResolverMode::Materialized => Self::resolve_materialized(conn, start, end)?,
        };

        out.sort_by_key(|r| r.start_datetime);
        Ok(out)
    }

    fn resolve_virtual(
        conn: &Connection,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<ResolvedOccurrence>> {
        let mut out = Vec::new();

        for pattern in patterns::load_patterns(conn, true)? {
            Self::expand_pattern(conn, &pattern, start, end, &mut out)?;
        }

        // Standalone sessions carry their own state; a cancelled one
        // simply drops out of the feed.
        for row in occurrences::load_standalone_in_range(conn, start, end)? {
            if row.status.is_cancelled() {
                continue;
            }
            out.push(ResolvedOccurrence::from_row(&row));
        }

        Ok(out)
    }

    /// Expand one pattern into the window.
    ///
    /// Candidate dates start at the first weekday-aligned date on or
    /// after `max(pattern.start_date, start.date())` and step by 7 days
    /// up to `min(pattern.end_date, end.date())`. Each candidate is then
    /// checked against the exception overlay and finally against the
    /// window itself; the instant filter is the authoritative boundary.
    fn expand_pattern(
        conn: &Connection,
        pattern: &RecurrencePattern,
        start: NaiveDateTime,
        end: NaiveDateTime,
        out: &mut Vec<ResolvedOccurrence>,
    ) -> AppResult<()> {
        let lower = pattern.start_date.max(start.date());
        let upper = match pattern.end_date {
            Some(e) => e.min(end.date()),
            None => end.date(),
        };
        if upper < lower {
            return Ok(());
        }

        let overrides: HashMap<_, _> = exceptions::load_exceptions_for_pattern(conn, pattern.id)?
            .into_iter()
            .map(|ex| (ex.exception_date, ex))
            .collect();

        for date in aligned_dates(lower, upper, pattern.weekday.index()) {
            let (instant, is_modified) = match overrides.get(&date) {
                Some(ex) if ex.is_cancelled => continue,
                Some(ex) => match ex.modified_datetime {
                    Some(moved) => (moved, true),
                    None => (pattern.instant_on(date), false),
                },
                None => (pattern.instant_on(date), false),
            };

            if instant < start || instant >= end {
                continue;
            }

            out.push(ResolvedOccurrence {
                pattern_id: Some(pattern.id),
                occurrence_id: None,
                occurrence_date: date,
                start_datetime: instant,
                title: pattern.title.clone(),
                description: pattern.description.clone(),
                duration_minutes: pattern.duration_minutes,
                is_modified,
            });
        }

        Ok(())
    }

    fn resolve_materialized(
        conn: &Connection,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> AppResult<Vec<ResolvedOccurrence>> {
        let rows = occurrences::load_in_range(conn, start, end, None)?;

        Ok(rows
            .iter()
            .filter(|row| !row.status.is_cancelled())
            .map(|row| ResolvedOccurrence::from_row(row))
            .collect())
    }
}
