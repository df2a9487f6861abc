use super::occurrence::SessionOccurrence;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One entry of the resolved calendar feed.
///
/// `occurrence_date` is the template date identifying the instance within
/// its series; `start_datetime` is the effective instant after applying
/// any reschedule. For standalone sessions the two coincide.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedOccurrence {
    pub pattern_id: Option<i32>,
    pub occurrence_id: Option<i32>,
    pub occurrence_date: NaiveDate,
    pub start_datetime: NaiveDateTime,
    pub title: String,
    pub description: String,
    pub duration_minutes: i32,
    pub is_modified: bool,
}

impl ResolvedOccurrence {
    /// Build a feed entry from a materialized (or standalone) row.
    pub fn from_row(row: &SessionOccurrence) -> Self {
        Self {
            pattern_id: row.pattern_id,
            occurrence_id: Some(row.id),
            occurrence_date: row.start_datetime.date(),
            start_datetime: row.start_datetime,
            title: row.title.clone(),
            description: row.description.clone(),
            duration_minutes: row.duration_minutes,
            is_modified: row.is_exception,
        }
    }
}
