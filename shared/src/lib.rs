use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub type TaskId = i64;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    /// Wire name, as used by the API and the CSV export.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Todo => "da fare",
            TaskStatus::InProgress => "in corso",
            TaskStatus::Done => "completato",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "bassa",
            Priority::Medium => "media",
            Priority::High => "alta",
        }
    }

    pub fn parse(s: &str) -> Option<Priority> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }

    pub fn next(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }

    pub fn prev(self) -> Priority {
        match self {
            Priority::Low => Priority::High,
            Priority::Medium => Priority::Low,
            Priority::High => Priority::Medium,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub client_name: String,
    pub project_name: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// ISO 8601 timestamp exactly as the API sent it.
    pub due_date: String,
    pub estimated_hours: f64,
}

impl Task {
    /// Parsed due date. Accepts RFC 3339, a date-time without offset (taken
    /// as local time) and a bare `YYYY-MM-DD` (taken as midnight UTC).
    /// `None` for anything else.
    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        let raw = self.due_date.as_str();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        {
            return naive
                .and_local_timezone(Local)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    pub fn with_status(&self, status: TaskStatus) -> Task {
        Task {
            status,
            ..self.clone()
        }
    }
}

/// Body of `POST /api/tasks`. The server assigns the id.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub client_name: String,
    pub project_name: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub estimated_hours: f64,
    pub status: TaskStatus,
    pub due_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> Task {
        Task {
            id: 7,
            client_name: "Acme".into(),
            project_name: "Site".into(),
            title: "Draft".into(),
            description: String::new(),
            status: TaskStatus::InProgress,
            priority: Priority::High,
            due_date: "2024-01-01T00:00:00.000Z".into(),
            estimated_hours: 3.0,
        }
    }

    #[test]
    fn task_uses_camel_case_keys_and_snake_case_enums() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 7,
                "clientName": "Acme",
                "projectName": "Site",
                "title": "Draft",
                "description": "",
                "status": "in_progress",
                "priority": "high",
                "dueDate": "2024-01-01T00:00:00.000Z",
                "estimatedHours": 3.0,
            })
        );
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let task: Task = serde_json::from_value(json!({
            "id": 1,
            "clientName": "Acme",
            "projectName": "Site",
            "title": "Draft",
            "status": "todo",
            "priority": "low",
            "dueDate": "2024-03-05T10:00:00Z",
            "estimatedHours": 2,
        }))
        .unwrap();
        assert_eq!(task.description, "");
        assert_eq!(task.estimated_hours, 2.0);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let result: Result<TaskStatus, _> = serde_json::from_value(json!("blocked"));
        assert!(result.is_err());
    }

    #[test]
    fn due_at_parses_rfc3339_and_tolerates_garbage() {
        let mut task = sample();
        assert_eq!(
            task.due_at().map(|d| d.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
        task.due_date = "not a date".into();
        assert_eq!(task.due_at(), None);
    }

    #[test]
    fn due_at_accepts_dates_without_offset() {
        let mut task = sample();
        task.due_date = "2024-01-01".into();
        assert_eq!(
            task.due_at().map(|d| d.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );

        task.due_date = "2024-02-01T10:00:00".into();
        let local = NaiveDate::from_ymd_opt(2024, 2, 1)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .and_then(|dt| dt.and_local_timezone(Local).earliest())
            .map(|dt| dt.with_timezone(&Utc));
        assert!(local.is_some());
        assert_eq!(task.due_at(), local);

        task.due_date = "2024-02-01T10:00".into();
        assert_eq!(task.due_at(), local);

        task.due_date = "2024-02-30".into();
        assert_eq!(task.due_at(), None);
    }

    #[test]
    fn with_status_keeps_every_other_field() {
        let done = sample().with_status(TaskStatus::Done);
        assert!(done.is_done());
        assert_eq!(Task { status: TaskStatus::InProgress, ..done }, sample());
    }

    #[test]
    fn labels_and_wire_names() {
        assert_eq!(TaskStatus::parse("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::Done.label(), "completato");
        assert_eq!(Priority::default(), Priority::Medium);
        assert_eq!(Priority::High.next(), Priority::Low);
        assert_eq!(Priority::Low.prev(), Priority::High);
        assert_eq!(Priority::parse("medium").map(Priority::label), Some("media"));
    }
}
