use serde::Serialize;

/// Day of week for recurrence patterns, Monday = 0 .. Sunday = 6.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub fn from_index(i: i64) -> Option<Self> {
        match i {
            0 => Some(Self::Monday),
            1 => Some(Self::Tuesday),
            2 => Some(Self::Wednesday),
            3 => Some(Self::Thursday),
            4 => Some(Self::Friday),
            5 => Some(Self::Saturday),
            6 => Some(Self::Sunday),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            Self::Monday => 0,
            Self::Tuesday => 1,
            Self::Wednesday => 2,
            Self::Thursday => 3,
            Self::Friday => 4,
            Self::Saturday => 5,
            Self::Sunday => 6,
        }
    }

    /// Accepts a numeric index ("0".."6") or a day name ("mon", "monday", ...).
    pub fn wd_from_str(s: &str) -> Option<Self> {
        if let Ok(i) = s.parse::<i64>() {
            return Self::from_index(i);
        }
        match s.to_lowercase().as_str() {
            "mon" | "monday" => Some(Self::Monday),
            "tue" | "tuesday" => Some(Self::Tuesday),
            "wed" | "wednesday" => Some(Self::Wednesday),
            "thu" | "thursday" => Some(Self::Thursday),
            "fri" | "friday" => Some(Self::Friday),
            "sat" | "saturday" => Some(Self::Saturday),
            "sun" | "sunday" => Some(Self::Sunday),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}
