use serde::{Deserialize, Serialize};

/// Task board columns. Transitions are free-form within this closed set -
/// there is deliberately no forward-only ordering between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "To-Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "In Review")]
    InReview,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To-Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::InReview => "In Review",
            TaskStatus::Done => "Done",
        }
    }

    pub fn parse(s: &str) -> Option<TaskStatus> {
        match s {
            "To-Do" => Some(TaskStatus::ToDo),
            "In Progress" => Some(TaskStatus::InProgress),
            "In Review" => Some(TaskStatus::InReview),
            "Done" => Some(TaskStatus::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "Low",
            TaskPriority::Medium => "Medium",
            TaskPriority::High => "High",
            TaskPriority::Critical => "Critical",
        }
    }

    pub fn parse(s: &str) -> Option<TaskPriority> {
        match s {
            "Low" => Some(TaskPriority::Low),
            "Medium" => Some(TaskPriority::Medium),
            "High" => Some(TaskPriority::High),
            "Critical" => Some(TaskPriority::Critical),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Task {
    pub task_id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee_id: Option<String>,
    /// Provenance string: "Admin: {email}" for manual creation,
    /// "Generated by AI (Admin: {email})" for synthesized tasks.
    pub creator: String,
    /// The approval gate. A developer cannot see or act on a task until an
    /// admin has flipped this.
    pub is_approved: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskPayload {
    pub project_id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub assignee_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusPayload {
    pub status: TaskStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_values_match_the_board_labels() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::ToDo).unwrap(),
            "\"To-Do\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"In Review\"").unwrap();
        assert_eq!(parsed, TaskStatus::InReview);
        assert!(serde_json::from_str::<TaskStatus>("\"Shipped\"").is_err());
    }

    #[test]
    fn status_parse_mirrors_serde_names() {
        for status in [
            TaskStatus::ToDo,
            TaskStatus::InProgress,
            TaskStatus::InReview,
            TaskStatus::Done,
        ] {
            assert_eq!(TaskStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(TaskStatus::parse("todo"), None);
    }

    #[test]
    fn priority_parse_mirrors_serde_names() {
        for priority in [
            TaskPriority::Low,
            TaskPriority::Medium,
            TaskPriority::High,
            TaskPriority::Critical,
        ] {
            assert_eq!(TaskPriority::parse(priority.as_str()), Some(priority));
        }
        assert_eq!(TaskPriority::parse("urgent"), None);
    }

    #[test]
    fn create_payload_priority_and_assignee_are_optional() {
        let payload: CreateTaskPayload = serde_json::from_str(
            r#"{"project_id": "p-1", "title": "Wire login", "description": "OIDC flow"}"#,
        )
        .unwrap();
        assert!(payload.priority.is_none());
        assert!(payload.assignee_id.is_none());
    }
}
