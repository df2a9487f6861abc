mod csv;
mod json;
mod model;

pub use model::OccurrenceExport;

use crate::db::occurrences;
use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn ef_from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

pub struct ExportLogic;

impl ExportLogic {
    /// Export the occurrence rows in `[from, to)` to a file.
    /// Returns the number of exported rows.
    pub fn export(
        conn: &Connection,
        path: &str,
        format: ExportFormat,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> AppResult<usize> {
        if from >= to {
            return Err(AppError::InvalidRange(
                "Start datetime must be before end datetime".into(),
            ));
        }

        let rows: Vec<OccurrenceExport> = occurrences::load_in_range(conn, from, to, None)?
            .iter()
            .map(OccurrenceExport::from_row)
            .collect();

        match format {
            ExportFormat::Json => json::write_json(path, &rows)?,
            ExportFormat::Csv => csv::write_csv(path, &rows)?,
        }

        Ok(rows.len())
    }
}
