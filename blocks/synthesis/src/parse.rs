use serde::Deserialize;

use taskforge_atoms::error::ApiError;
use taskforge_atoms::tasks::model::{Task, TaskPriority, TaskStatus};

/// Marker under which assignment reasoning from the model is appended to a
/// task description.
pub const AI_NOTES_MARKER: &str = "--- AI Notes ---";

/// One element of the JSON array the model is instructed to return. Every
/// field is optional; defaults are applied when building the task.
#[derive(Debug, Deserialize)]
pub struct GeneratedTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default, rename = "assigneeId")]
    pub assignee_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Models love to wrap JSON in markdown fences despite instructions.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parse the raw model text into task drafts. Anything that is not a JSON
/// array of objects is an InvalidAiResponse; the caller writes nothing.
pub fn parse_generated_tasks(raw: &str) -> Result<Vec<GeneratedTask>, ApiError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned)
        .map_err(|e| ApiError::InvalidAiResponse(format!("expected a JSON task array: {}", e)))
}

/// Materialize a draft into a persistable task. Regardless of what the model
/// claimed, the result is unapproved and sits in To-Do.
pub fn build_task(generated: GeneratedTask, project_id: &str, admin_email: &str) -> Task {
    let mut description = generated
        .description
        .unwrap_or_else(|| "No description provided.".to_string());
    if let Some(notes) = generated.notes.filter(|n| !n.is_empty()) {
        description.push_str(&format!("\n\n{}\n{}", AI_NOTES_MARKER, notes));
    }

    let now = chrono::Utc::now().to_rfc3339();
    Task {
        task_id: uuid::Uuid::new_v4().to_string(),
        project_id: project_id.to_string(),
        title: generated
            .title
            .unwrap_or_else(|| "Untitled Task".to_string()),
        description,
        status: TaskStatus::ToDo,
        priority: generated
            .priority
            .as_deref()
            .and_then(TaskPriority::parse)
            .unwrap_or(TaskPriority::Medium),
        assignee_id: generated.assignee_id,
        creator: format!("Generated by AI (Admin: {})", admin_email),
        is_approved: false,
        created_at: now.clone(),
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_is_unwrapped() {
        let raw = "```json\n[{\"title\": \"A\"}]\n```";
        assert_eq!(strip_code_fences(raw), "[{\"title\": \"A\"}]");
    }

    #[test]
    fn bare_json_passes_through() {
        assert_eq!(strip_code_fences("  [1, 2]  "), "[1, 2]");
    }

    #[test]
    fn malformed_response_is_invalid_ai_response() {
        let err = parse_generated_tasks("I'm sorry, I can't do that.").unwrap_err();
        assert!(matches!(err, ApiError::InvalidAiResponse(_)));

        let err = parse_generated_tasks("{\"title\": \"not an array\"}").unwrap_err();
        assert!(matches!(err, ApiError::InvalidAiResponse(_)));
    }

    #[test]
    fn missing_fields_get_defaults() {
        let drafts = parse_generated_tasks("[{}]").unwrap();
        let task = build_task(
            drafts.into_iter().next().unwrap(),
            "p-1",
            "boss@example.com",
        );
        assert_eq!(task.title, "Untitled Task");
        assert_eq!(task.description, "No description provided.");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.assignee_id, None);
    }

    #[test]
    fn notes_are_appended_under_the_marker() {
        let drafts = parse_generated_tasks(
            r#"[{"title": "Login", "description": "Build it.", "notes": "Ada knows OIDC."}]"#,
        )
        .unwrap();
        let task = build_task(drafts.into_iter().next().unwrap(), "p-1", "boss@example.com");
        assert_eq!(
            task.description,
            "Build it.\n\n--- AI Notes ---\nAda knows OIDC."
        );
    }

    #[test]
    fn empty_notes_leave_description_alone() {
        let drafts =
            parse_generated_tasks(r#"[{"description": "Build it.", "notes": ""}]"#).unwrap();
        let task = build_task(drafts.into_iter().next().unwrap(), "p-1", "boss@example.com");
        assert_eq!(task.description, "Build it.");
    }

    #[test]
    fn unknown_priority_coerces_to_medium() {
        let drafts = parse_generated_tasks(r#"[{"priority": "Blocker"}]"#).unwrap();
        let task = build_task(drafts.into_iter().next().unwrap(), "p-1", "boss@example.com");
        assert_eq!(task.priority, TaskPriority::Medium);
    }

    #[test]
    fn generated_tasks_are_always_unapproved_todo() {
        let drafts = parse_generated_tasks(
            r#"[{"title": "X", "priority": "Critical", "assigneeId": "sub-7"}]"#,
        )
        .unwrap();
        let task = build_task(drafts.into_iter().next().unwrap(), "p-1", "boss@example.com");
        assert!(!task.is_approved);
        assert_eq!(task.status, TaskStatus::ToDo);
        assert_eq!(task.priority, TaskPriority::Critical);
        assert_eq!(task.assignee_id.as_deref(), Some("sub-7"));
        assert_eq!(task.project_id, "p-1");
        assert_eq!(task.creator, "Generated by AI (Admin: boss@example.com)");
    }

    #[test]
    fn null_assignee_is_accepted() {
        let drafts = parse_generated_tasks(r#"[{"title": "X", "assigneeId": null}]"#).unwrap();
        assert!(drafts[0].assignee_id.is_none());
    }
}
