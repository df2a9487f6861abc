use super::model::OccurrenceExport;
use crate::errors::{AppError, AppResult};
use csv::Writer;

/// Write the rows as CSV.
pub fn write_csv(path: &str, rows: &[OccurrenceExport]) -> AppResult<()> {
    let mut wtr = Writer::from_path(path).map_err(|e| AppError::Export(e.to_string()))?;

    wtr.write_record([
        "id",
        "pattern_id",
        "title",
        "start_datetime",
        "duration_minutes",
        "status",
        "is_exception",
    ])
    .map_err(|e| AppError::Export(e.to_string()))?;

    for row in rows {
        wtr.write_record(&[
            row.id.to_string(),
            row.pattern_id.map(|v| v.to_string()).unwrap_or_default(),
            row.title.clone(),
            row.start_datetime.clone(),
            row.duration_minutes.to_string(),
            row.status.clone(),
            row.is_exception.to_string(),
        ])
        .map_err(|e| AppError::Export(e.to_string()))?;
    }

    wtr.flush()?;
    Ok(())
}
