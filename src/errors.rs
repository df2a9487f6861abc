//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid time format: {0}")]
    InvalidTime(String),

    #[error("Invalid datetime format: {0}")]
    InvalidDateTime(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    // ---------------------------
    // Validation errors
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid occurrence date: {0}")]
    InvalidOccurrenceDate(String),

    // ---------------------------
    // State conflicts
    // ---------------------------
    #[error("Occurrence is already cancelled")]
    AlreadyCancelled,

    #[error("Occurrence is already completed")]
    AlreadyCompleted,

    #[error("Cannot complete a cancelled occurrence")]
    CancelledCannotComplete,

    // ---------------------------
    // Lookup errors
    // ---------------------------
    #[error("Not found: {0}")]
    NotFound(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    #[error("Failed to save configuration")]
    ConfigSave,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export format not supported: {0}")]
    InvalidExportFormat(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

pub type AppResult<T> = Result<T, AppError>;
