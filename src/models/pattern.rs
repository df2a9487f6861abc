use super::weekday::Weekday;
use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Weekly recurrence template for a session.
///
/// The pattern itself never appears in a calendar feed; the resolver
/// expands it into concrete occurrences, and the generation service can
/// materialize those as `SessionOccurrence` rows.
#[derive(Debug, Clone, Serialize)]
pub struct RecurrencePattern {
    pub id: i32,
    pub title: String,          // ⇔ patterns.title
    pub description: String,    // ⇔ patterns.description
    pub weekday: Weekday,       // ⇔ patterns.weekday (INT 0..6, Monday=0)
    pub time_of_day: NaiveTime, // ⇔ patterns.time_of_day (TEXT "HH:MM")
    pub duration_minutes: i32,  // ⇔ patterns.duration_minutes (INT > 0)
    pub start_date: NaiveDate,  // ⇔ patterns.start_date (TEXT "YYYY-MM-DD")
    pub end_date: Option<NaiveDate>, // ⇔ patterns.end_date (nullable)
    pub is_active: bool,        // ⇔ patterns.is_active (INT 0/1)
    pub created_at: String,     // ⇔ patterns.created_at (TEXT, ISO8601)
}

impl RecurrencePattern {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        title: &str,
        description: &str,
        weekday: Weekday,
        time_of_day: NaiveTime,
        duration_minutes: i32,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: 0,
            title: title.to_string(),
            description: description.to_string(),
            weekday,
            time_of_day,
            duration_minutes,
            start_date,
            end_date,
            is_active: true,
            created_at: Local::now().to_rfc3339(),
        }
    }

    /// Field invariants: positive duration, end date strictly after start.
    /// The weekday range is guaranteed by the `Weekday` type.
    pub fn validate(&self) -> AppResult<()> {
        if self.duration_minutes <= 0 {
            return Err(AppError::Validation("Duration must be positive".into()));
        }
        if let Some(end) = self.end_date
            && end <= self.start_date
        {
            return Err(AppError::Validation(
                "End date must be after start date".into(),
            ));
        }
        Ok(())
    }

    /// Template instant for an occurrence date.
    pub fn instant_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.time_of_day)
    }

    pub fn start_str(&self) -> String {
        self.start_date.format("%Y-%m-%d").to_string()
    }

    pub fn time_str(&self) -> String {
        self.time_of_day.format("%H:%M").to_string()
    }
}
