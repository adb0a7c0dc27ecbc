use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{TaskId, UserId};
use crate::enums::{TaskPriority, TaskStatus};

/// A unit of work assigned by a creator to an executor.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    /// Raw ISO-8601 deadline. Kept as a string so malformed values degrade in
    /// sorting instead of failing the whole list.
    #[serde(default)]
    pub due_at: Option<String>,
    /// Absent in responses from the first backend generation.
    #[serde(default)]
    pub creator: Option<UserId>,
    #[serde(default)]
    pub creator_name: Option<String>,
    #[serde(default)]
    pub creator_position: Option<String>,
    #[serde(default)]
    pub assignee: Option<UserId>,
    #[serde(default)]
    pub assignee_name: Option<String>,
    #[serde(default)]
    pub assignee_position: Option<String>,
    #[serde(default)]
    pub executor_comment: Option<String>,
    #[serde(default)]
    pub result_file: Option<String>,
    #[serde(default)]
    pub attachments: Vec<TaskAttachment>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A file attached to a task by either party.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TaskAttachment {
    pub id: i64,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Deadline as epoch milliseconds; missing or malformed deadlines are 0.
    #[must_use]
    pub fn due_millis(&self) -> i64 {
        self.due_at.as_deref().map_or(0, parse_due_millis)
    }
}

/// Parse a deadline string into epoch milliseconds.
///
/// Accepts RFC 3339 timestamps, offset-less `YYYY-MM-DDTHH:MM[:SS]` (read as
/// UTC), and bare dates (midnight UTC). Anything else yields 0.
#[must_use]
pub fn parse_due_millis(raw: &str) -> i64 {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.timestamp_millis();
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return parsed.and_utc().timestamp_millis();
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map_or(0, |midnight| midnight.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("2024-01-01T00:00:00Z", 1_704_067_200_000)]
    #[case("2024-01-01T03:00:00+03:00", 1_704_067_200_000)]
    #[case("2024-01-01T00:00:00", 1_704_067_200_000)]
    #[case("2024-01-01T00:00", 1_704_067_200_000)]
    #[case("2024-01-01", 1_704_067_200_000)]
    #[case("next tuesday", 0)]
    #[case("", 0)]
    fn parses_deadlines_with_fallback(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_due_millis(raw), expected);
    }

    #[test]
    fn deserializes_minimal_first_generation_payload() {
        let json = r#"{
            "id": 7,
            "title": "Отчёт",
            "status": "new",
            "priority": "low",
            "assignee": null,
            "due_at": null
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, 7);
        assert!(task.creator.is_none());
        assert!(task.attachments.is_empty());
        assert_eq!(task.due_millis(), 0);
    }
}
