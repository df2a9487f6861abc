use crate::models::occurrence::SessionOccurrence;
use serde::Serialize;

/// Flat row shape for occurrence exports.
#[derive(Serialize, Clone, Debug)]
pub struct OccurrenceExport {
    pub id: i32,
    pub pattern_id: Option<i32>,
    pub title: String,
    pub start_datetime: String,
    pub duration_minutes: i32,
    pub status: String,
    pub is_exception: bool,
}

impl OccurrenceExport {
    pub fn from_row(o: &SessionOccurrence) -> Self {
        Self {
            id: o.id,
            pattern_id: o.pattern_id,
            title: o.title.clone(),
            start_datetime: o.start_str(),
            duration_minutes: o.duration_minutes,
            status: o.status.to_db_str().to_string(),
            is_exception: o.is_exception,
        }
    }
}
