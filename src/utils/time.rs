//! Time utilities: parsing HH:MM and "YYYY-MM-DD HH:MM" instants.

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDateTime, NaiveTime};

pub fn parse_time(t: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(t, "%H:%M").ok()
}

pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").ok()
}

pub fn parse_optional_time(input: Option<&String>) -> AppResult<Option<NaiveTime>> {
    if let Some(s) = input {
        let t = parse_time(s).ok_or_else(|| AppError::InvalidTime(s.to_string()))?;
        Ok(Some(t))
    } else {
        Ok(None)
    }
}

pub fn parse_optional_datetime(input: Option<&String>) -> AppResult<Option<NaiveDateTime>> {
    if let Some(s) = input {
        let dt = parse_datetime(s).ok_or_else(|| AppError::InvalidDateTime(s.to_string()))?;
        Ok(Some(dt))
    } else {
        Ok(None)
    }
}
