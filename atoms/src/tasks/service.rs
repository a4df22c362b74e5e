use aws_sdk_dynamodb::types::{AttributeValue, Put, TransactWriteItem};
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{CreateTaskPayload, Task, TaskPriority, TaskStatus};
use crate::error::ApiError;
use crate::item::{bool_attr, opt_string_attr, string_attr, Item};

/// Tasks are a listable entity:
/// PK = "TASK", SK = "TASK#{task_id}"
/// Comments hang off a separate partition keyed by the task id (see the
/// comments service), so deleting a task does not touch them.
const TASK_PK: &str = "TASK";

/// Hard DynamoDB ceiling for a single TransactWriteItems call.
pub const TRANSACT_MAX_ITEMS: usize = 100;

fn task_sk(task_id: &str) -> String {
    format!("TASK#{}", task_id)
}

pub fn task_from_item(item: &Item) -> Option<Task> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let task_id = sk.strip_prefix("TASK#")?.to_string();
    Some(Task {
        task_id,
        project_id: string_attr(item, "project_id"),
        title: string_attr(item, "title"),
        description: string_attr(item, "description"),
        status: item
            .get("task_status")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| TaskStatus::parse(s))
            .unwrap_or(TaskStatus::ToDo),
        priority: item
            .get("priority")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| TaskPriority::parse(s))
            .unwrap_or(TaskPriority::Medium),
        assignee_id: opt_string_attr(item, "assignee_id"),
        creator: string_attr(item, "creator"),
        is_approved: bool_attr(item, "is_approved"),
        created_at: string_attr(item, "created_at"),
        updated_at: string_attr(item, "updated_at"),
    })
}

pub fn task_item(task: &Task) -> Item {
    let mut item = Item::new();
    item.insert("PK".to_string(), AttributeValue::S(TASK_PK.to_string()));
    item.insert("SK".to_string(), AttributeValue::S(task_sk(&task.task_id)));
    item.insert(
        "project_id".to_string(),
        AttributeValue::S(task.project_id.clone()),
    );
    item.insert("title".to_string(), AttributeValue::S(task.title.clone()));
    item.insert(
        "description".to_string(),
        AttributeValue::S(task.description.clone()),
    );
    item.insert(
        "task_status".to_string(),
        AttributeValue::S(task.status.as_str().to_string()),
    );
    item.insert(
        "priority".to_string(),
        AttributeValue::S(task.priority.as_str().to_string()),
    );
    if let Some(assignee_id) = &task.assignee_id {
        item.insert(
            "assignee_id".to_string(),
            AttributeValue::S(assignee_id.clone()),
        );
    }
    item.insert(
        "creator".to_string(),
        AttributeValue::S(task.creator.clone()),
    );
    item.insert(
        "is_approved".to_string(),
        AttributeValue::Bool(task.is_approved),
    );
    item.insert(
        "created_at".to_string(),
        AttributeValue::S(task.created_at.clone()),
    );
    item.insert(
        "updated_at".to_string(),
        AttributeValue::S(task.updated_at.clone()),
    );
    item
}

/// Manual creation by an admin: approved immediately, lands in To-Do.
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    admin_email: &str,
    payload: CreateTaskPayload,
) -> Result<Task, ApiError> {
    let task_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    let task = Task {
        task_id,
        project_id: payload.project_id,
        title: payload.title,
        description: payload.description,
        status: TaskStatus::ToDo,
        priority: payload.priority.unwrap_or(TaskPriority::Medium),
        assignee_id: payload.assignee_id,
        creator: format!("Admin: {}", admin_email),
        is_approved: true,
        created_at: now.clone(),
        updated_at: now,
    };

    client
        .put_item()
        .table_name(table_name)
        .set_item(Some(task_item(&task)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB put_item error: {}", e)))?;

    Ok(task)
}

pub async fn get_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Task, ApiError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB get_item error: {}", e)))?;

    result
        .item()
        .and_then(task_from_item)
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}

/// Every task in the system, newest first.
pub async fn list_all_tasks(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Task>, ApiError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(TASK_PK.to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB query error: {}", e)))?;

    let mut tasks: Vec<Task> = result.items().iter().filter_map(task_from_item).collect();
    // RFC 3339 UTC strings sort lexicographically
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(tasks)
}

/// A developer's view: only tasks assigned to them that have cleared the
/// approval gate.
pub async fn list_tasks_for_assignee(
    client: &DynamoClient,
    table_name: &str,
    assignee_id: &str,
) -> Result<Vec<Task>, ApiError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .filter_expression("assignee_id = :assignee_id AND is_approved = :approved")
        .expression_attribute_values(":pk", AttributeValue::S(TASK_PK.to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("TASK#".to_string()))
        .expression_attribute_values(":assignee_id", AttributeValue::S(assignee_id.to_string()))
        .expression_attribute_values(":approved", AttributeValue::Bool(true))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB query error: {}", e)))?;

    Ok(result.items().iter().filter_map(task_from_item).collect())
}

/// Flip the approval gate. Re-approving is a no-op success: the stored task
/// comes back unchanged, updated_at included.
pub async fn approve_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Task, ApiError> {
    let mut task = get_task(client, table_name, task_id).await?;
    if task.is_approved {
        return Ok(task);
    }

    let now = chrono::Utc::now().to_rfc3339();
    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .update_expression("SET is_approved = :approved, updated_at = :updated_at")
        .expression_attribute_values(":approved", AttributeValue::Bool(true))
        .expression_attribute_values(":updated_at", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB update_item error: {}", e)))?;

    task.is_approved = true;
    task.updated_at = now;
    Ok(task)
}

/// Admin full-field overwrite of title/description/priority/assignee/project.
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    payload: CreateTaskPayload,
) -> Result<Task, ApiError> {
    get_task(client, table_name, task_id).await?;

    let now = chrono::Utc::now().to_rfc3339();
    let mut builder = client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .expression_attribute_names("#title", "title")
        .expression_attribute_values(":title", AttributeValue::S(payload.title))
        .expression_attribute_values(":description", AttributeValue::S(payload.description))
        .expression_attribute_values(
            ":priority",
            AttributeValue::S(
                payload
                    .priority
                    .unwrap_or(TaskPriority::Medium)
                    .as_str()
                    .to_string(),
            ),
        )
        .expression_attribute_values(":project_id", AttributeValue::S(payload.project_id))
        .expression_attribute_values(":updated_at", AttributeValue::S(now));

    let set_clause = "SET #title = :title, description = :description, \
                      priority = :priority, project_id = :project_id, \
                      updated_at = :updated_at";
    // A missing assignee in the payload unassigns the task (full overwrite)
    let update_expression = match payload.assignee_id {
        Some(assignee_id) => {
            builder = builder
                .expression_attribute_values(":assignee_id", AttributeValue::S(assignee_id));
            format!("{}, assignee_id = :assignee_id", set_clause)
        }
        None => format!("{} REMOVE assignee_id", set_clause),
    };

    builder
        .update_expression(update_expression)
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB update_item error: {}", e)))?;

    get_task(client, table_name, task_id).await
}

/// Status change after the access check has passed. Any of the four board
/// columns is accepted; there is no transition graph.
pub async fn update_status(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    status: TaskStatus,
) -> Result<Task, ApiError> {
    let now = chrono::Utc::now().to_rfc3339();
    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .condition_expression("attribute_exists(PK)")
        .update_expression("SET task_status = :task_status, updated_at = :updated_at")
        .expression_attribute_values(
            ":task_status",
            AttributeValue::S(status.as_str().to_string()),
        )
        .expression_attribute_values(":updated_at", AttributeValue::S(now))
        .send()
        .await
        .map_err(|e| {
            let not_found = e
                .as_service_error()
                .map(|se| se.is_conditional_check_failed_exception())
                .unwrap_or(false);
            if not_found {
                ApiError::NotFound("Task not found".to_string())
            } else {
                ApiError::Store(format!("DynamoDB update_item error: {}", e))
            }
        })?;

    get_task(client, table_name, task_id).await
}

/// Unconditional delete. Comments under TASK#{id} are left orphaned on
/// purpose; there is no cascade in the nested-collection model.
pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<(), ApiError> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(TASK_PK.to_string()))
        .key("SK", AttributeValue::S(task_sk(task_id)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB delete_item error: {}", e)))?;

    Ok(())
}

/// All-or-nothing persist for an AI-generated batch. One TransactWriteItems
/// call; either every task lands or none do. An empty batch is a success
/// with zero writes.
pub async fn put_tasks_batch(
    client: &DynamoClient,
    table_name: &str,
    tasks: &[Task],
) -> Result<(), ApiError> {
    if tasks.is_empty() {
        return Ok(());
    }
    if tasks.len() > TRANSACT_MAX_ITEMS {
        return Err(ApiError::Store(format!(
            "Batch of {} tasks exceeds the {}-item transaction limit",
            tasks.len(),
            TRANSACT_MAX_ITEMS
        )));
    }

    let mut transact_items = Vec::with_capacity(tasks.len());
    for task in tasks {
        let put = Put::builder()
            .table_name(table_name)
            .set_item(Some(task_item(task)))
            .build()
            .map_err(|e| ApiError::Store(format!("Failed to build transaction item: {}", e)))?;
        transact_items.push(TransactWriteItem::builder().put(put).build());
    }

    client
        .transact_write_items()
        .set_transact_items(Some(transact_items))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB transact_write_items error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_task() -> Task {
        Task {
            task_id: "t-1".to_string(),
            project_id: "p-1".to_string(),
            title: "Wire login".to_string(),
            description: "OIDC flow".to_string(),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            assignee_id: Some("sub-9".to_string()),
            creator: "Admin: ada@example.com".to_string(),
            is_approved: true,
            created_at: "2026-02-01T08:00:00+00:00".to_string(),
            updated_at: "2026-02-02T09:30:00+00:00".to_string(),
        }
    }

    #[test]
    fn task_item_round_trips() {
        let task = sample_task();
        let parsed = task_from_item(&task_item(&task)).expect("parse");
        assert_eq!(parsed.task_id, task.task_id);
        assert_eq!(parsed.project_id, task.project_id);
        assert_eq!(parsed.status, task.status);
        assert_eq!(parsed.priority, task.priority);
        assert_eq!(parsed.assignee_id, task.assignee_id);
        assert_eq!(parsed.creator, task.creator);
        assert!(parsed.is_approved);
        assert_eq!(parsed.created_at, task.created_at);
        assert_eq!(parsed.updated_at, task.updated_at);
    }

    #[test]
    fn unassigned_task_has_no_assignee_attribute() {
        let mut task = sample_task();
        task.assignee_id = None;
        let item = task_item(&task);
        assert!(!item.contains_key("assignee_id"));
        let parsed = task_from_item(&item).expect("parse");
        assert_eq!(parsed.assignee_id, None);
    }

    #[test]
    fn corrupt_status_and_priority_fall_back_to_defaults() {
        let mut item = task_item(&sample_task());
        item.insert(
            "task_status".to_string(),
            AttributeValue::S("Shipped".to_string()),
        );
        item.insert(
            "priority".to_string(),
            AttributeValue::S("Urgent".to_string()),
        );
        let parsed = task_from_item(&item).expect("parse");
        assert_eq!(parsed.status, TaskStatus::ToDo);
        assert_eq!(parsed.priority, TaskPriority::Medium);
    }

    #[test]
    fn newest_first_ordering_uses_created_at() {
        let mut older = sample_task();
        older.task_id = "t-old".to_string();
        older.created_at = "2026-01-01T00:00:00+00:00".to_string();
        let mut newer = sample_task();
        newer.task_id = "t-new".to_string();
        newer.created_at = "2026-03-01T00:00:00+00:00".to_string();

        let mut tasks = vec![older, newer];
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        assert_eq!(tasks[0].task_id, "t-new");
        assert_eq!(tasks[1].task_id, "t-old");
    }
}
