use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum OccurrenceStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl OccurrenceStatus {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            OccurrenceStatus::Scheduled => "scheduled",
            OccurrenceStatus::Cancelled => "cancelled",
            OccurrenceStatus::Completed => "completed",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(OccurrenceStatus::Scheduled),
            "cancelled" => Some(OccurrenceStatus::Cancelled),
            "completed" => Some(OccurrenceStatus::Completed),
            _ => None,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, OccurrenceStatus::Scheduled)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, OccurrenceStatus::Cancelled)
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, OccurrenceStatus::Completed)
    }
}
