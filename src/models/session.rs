use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry in the recent-sessions log shown beside the timer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub label: String,
    /// Wall-clock completion time, already formatted for display ("03:45 PM").
    pub completed_at: String,
    pub duration_minutes: u32,
    pub is_break: bool,
}

impl SessionRecord {
    pub fn new(label: &str, at: DateTime<Local>, duration_minutes: u32, is_break: bool) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            label: label.to_string(),
            completed_at: at.format("%I:%M %p").to_string(),
            duration_minutes,
            is_break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn completion_time_uses_twelve_hour_clock() {
        let at = Local.with_ymd_and_hms(2026, 3, 4, 15, 45, 12).unwrap();
        let record = SessionRecord::new("Study Session", at, 25, false);
        assert_eq!(record.completed_at, "03:45 PM");
        assert_eq!(record.duration_minutes, 25);
        assert!(!record.is_break);
    }
}
