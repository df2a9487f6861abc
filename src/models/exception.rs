use crate::errors::{AppError, AppResult};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Per-date deviation from a recurrence pattern: either the occurrence on
/// `exception_date` is cancelled, or it is moved to `modified_datetime`.
/// At most one exception exists per `(pattern_id, exception_date)`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionException {
    pub id: i32,
    pub pattern_id: i32,
    pub exception_date: NaiveDate, // ⇔ exceptions.exception_date (TEXT "YYYY-MM-DD")
    pub is_cancelled: bool,
    pub modified_datetime: Option<NaiveDateTime>, // ⇔ TEXT "YYYY-MM-DD HH:MM"
    pub created_at: String,
}

impl SessionException {
    pub fn cancellation(pattern_id: i32, exception_date: NaiveDate) -> Self {
        Self {
            id: 0,
            pattern_id,
            exception_date,
            is_cancelled: true,
            modified_datetime: None,
            created_at: Local::now().to_rfc3339(),
        }
    }

    pub fn reschedule(
        pattern_id: i32,
        exception_date: NaiveDate,
        modified_datetime: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            pattern_id,
            exception_date,
            is_cancelled: false,
            modified_datetime: Some(modified_datetime),
            created_at: Local::now().to_rfc3339(),
        }
    }

    /// Cancelled and modified are mutually exclusive, and one is required.
    pub fn validate(&self) -> AppResult<()> {
        if self.is_cancelled && self.modified_datetime.is_some() {
            return Err(AppError::Validation(
                "An exception cannot be both cancelled and rescheduled".into(),
            ));
        }
        if !self.is_cancelled && self.modified_datetime.is_none() {
            return Err(AppError::Validation(
                "An exception must either cancel or reschedule the occurrence".into(),
            ));
        }
        Ok(())
    }

    pub fn date_str(&self) -> String {
        self.exception_date.format("%Y-%m-%d").to_string()
    }
}
