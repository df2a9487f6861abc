//! Occurrence generation: materializes pattern instances as rows.
//!
//! Invoked periodically through the `generate` command (the scheduling
//! mechanism is external) and inline on pattern creation.

use chrono::{Days, NaiveDate};
use rusqlite::Connection;

use crate::db::{occurrences, patterns};
use crate::errors::AppResult;
use crate::models::occurrence::SessionOccurrence;
use crate::models::pattern::RecurrencePattern;
use crate::utils::date::{aligned_dates, today};

pub const DAYS_PER_MONTH: u64 = 30;

/// How far ahead to materialize, in days or calendar-ish months.
#[derive(Debug, Clone, Copy)]
pub enum Horizon {
    Days(u64),
    Months(u64),
}

impl Horizon {
    pub fn days(&self) -> u64 {
        match self {
            Horizon::Days(d) => *d,
            Horizon::Months(m) => m * DAYS_PER_MONTH,
        }
    }
}

pub struct GenerateLogic;

impl GenerateLogic {
    /// Materialize occurrences for one pattern up to the horizon cutoff.
    ///
    /// Idempotent: a row is only inserted when none exists for the exact
    /// `(pattern, start_datetime)` pair, so re-running over the same
    /// horizon creates nothing new. Inactive patterns produce nothing.
    pub fn generate_for_pattern(
        conn: &Connection,
        pattern: &RecurrencePattern,
        horizon: Horizon,
    ) -> AppResult<Vec<SessionOccurrence>> {
        if !pattern.is_active {
            return Ok(Vec::new());
        }

        let cutoff = Self::end_generation_date(pattern, horizon);

        let mut created = Vec::new();
        for date in aligned_dates(pattern.start_date, cutoff, pattern.weekday.index()) {
            let start = pattern.instant_on(date);
            if occurrences::occurrence_exists(conn, pattern.id, start)? {
                continue;
            }

            let mut occurrence = SessionOccurrence::from_pattern(pattern, start);
            occurrence.id = occurrences::insert_occurrence(conn, &occurrence)?;
            created.push(occurrence);
        }

        Ok(created)
    }

    /// The pattern's own end date wins when it is earlier than the
    /// horizon-derived cutoff.
    fn end_generation_date(pattern: &RecurrencePattern, horizon: Horizon) -> NaiveDate {
        let cutoff = today() + Days::new(horizon.days());

        match pattern.end_date {
            Some(end) if end < cutoff => end,
            _ => cutoff,
        }
    }

    /// Periodic entry point: generate for all active patterns in one
    /// transaction. Returns the total number of occurrences created.
    pub fn generate_for_all(conn: &mut Connection, horizon: Horizon) -> AppResult<usize> {
        let active = patterns::load_patterns(conn, true)?;

        let tx = conn.transaction()?;
        let mut total = 0;
        for pattern in &active {
            total += Self::generate_for_pattern(&tx, pattern, horizon)?.len();
        }
        tx.commit()?;

        Ok(total)
    }
}
