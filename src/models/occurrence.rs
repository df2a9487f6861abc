use super::pattern::RecurrencePattern;
use super::status::OccurrenceStatus;
use chrono::{Local, NaiveDateTime};
use serde::Serialize;

/// A concrete, independently addressable bookable instance.
///
/// Rows with `pattern_id = None` are standalone one-time sessions; rows
/// owned by a pattern are produced by the generation service and flip
/// `is_exception` once edited away from the template.
#[derive(Debug, Clone, Serialize)]
pub struct SessionOccurrence {
    pub id: i32,
    pub pattern_id: Option<i32>,       // ⇔ occurrences.pattern_id (nullable FK)
    pub title: String,
    pub description: String,
    pub start_datetime: NaiveDateTime, // ⇔ occurrences.start_datetime (TEXT "YYYY-MM-DD HH:MM")
    pub duration_minutes: i32,
    pub status: OccurrenceStatus,      // ⇔ occurrences.status
    pub is_exception: bool,            // ⇔ occurrences.is_exception (INT 0/1)
    pub created_at: String,            // ⇔ occurrences.created_at (TEXT, ISO8601)
}

impl SessionOccurrence {
    pub fn new(
        pattern_id: Option<i32>,
        title: &str,
        description: &str,
        start_datetime: NaiveDateTime,
        duration_minutes: i32,
    ) -> Self {
        Self {
            id: 0,
            pattern_id,
            title: title.to_string(),
            description: description.to_string(),
            start_datetime,
            duration_minutes,
            status: OccurrenceStatus::Scheduled,
            is_exception: false,
            created_at: Local::now().to_rfc3339(),
        }
    }

    /// Template instantiation used by the generation service.
    pub fn from_pattern(pattern: &RecurrencePattern, start_datetime: NaiveDateTime) -> Self {
        Self::new(
            Some(pattern.id),
            &pattern.title,
            &pattern.description,
            start_datetime,
            pattern.duration_minutes,
        )
    }

    pub fn is_standalone(&self) -> bool {
        self.pattern_id.is_none()
    }

    pub fn start_str(&self) -> String {
        self.start_datetime.format("%Y-%m-%d %H:%M").to_string()
    }
}
