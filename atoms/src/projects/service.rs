use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{CreateProjectPayload, Project};
use crate::error::ApiError;
use crate::item::{string_attr, string_list_attr, string_list_value, Item};

/// PK = "PROJECT", SK = "PROJECT#{project_id}"
const PROJECT_PK: &str = "PROJECT";

fn project_sk(project_id: &str) -> String {
    format!("PROJECT#{}", project_id)
}

pub fn project_from_item(item: &Item) -> Option<Project> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let project_id = sk.strip_prefix("PROJECT#")?.to_string();
    Some(Project {
        project_id,
        title: string_attr(item, "title"),
        description: string_attr(item, "description"),
        member_ids: string_list_attr(item, "member_ids"),
    })
}

pub async fn create_project(
    client: &DynamoClient,
    table_name: &str,
    payload: CreateProjectPayload,
) -> Result<Project, ApiError> {
    let project_id = uuid::Uuid::new_v4().to_string();

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(PROJECT_PK.to_string()))
        .item("SK", AttributeValue::S(project_sk(&project_id)))
        .item("title", AttributeValue::S(payload.title.clone()))
        .item("description", AttributeValue::S(payload.description.clone()))
        .item("member_ids", string_list_value(&[]))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB put_item error: {}", e)))?;

    Ok(Project {
        project_id,
        title: payload.title,
        description: payload.description,
        member_ids: vec![],
    })
}

pub async fn get_project(
    client: &DynamoClient,
    table_name: &str,
    project_id: &str,
) -> Result<Project, ApiError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(PROJECT_PK.to_string()))
        .key("SK", AttributeValue::S(project_sk(project_id)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB get_item error: {}", e)))?;

    result
        .item()
        .and_then(project_from_item)
        .ok_or_else(|| ApiError::NotFound("Project not found".to_string()))
}

pub async fn list_projects(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<Project>, ApiError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(PROJECT_PK.to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("PROJECT#".to_string()))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB query error: {}", e)))?;

    Ok(result.items().iter().filter_map(project_from_item).collect())
}

pub async fn update_project(
    client: &DynamoClient,
    table_name: &str,
    project_id: &str,
    payload: CreateProjectPayload,
) -> Result<Project, ApiError> {
    // Existence check keeps the 404 contract; the update itself is blind
    get_project(client, table_name, project_id).await?;

    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(PROJECT_PK.to_string()))
        .key("SK", AttributeValue::S(project_sk(project_id)))
        .update_expression("SET #title = :title, description = :description")
        .expression_attribute_names("#title", "title")
        .expression_attribute_values(":title", AttributeValue::S(payload.title))
        .expression_attribute_values(":description", AttributeValue::S(payload.description))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB update_item error: {}", e)))?;

    get_project(client, table_name, project_id).await
}

/// Unconditional delete. Tasks pointing at the project are left dangling;
/// there is no cross-reference integrity between projects and tasks.
pub async fn delete_project(
    client: &DynamoClient,
    table_name: &str,
    project_id: &str,
) -> Result<(), ApiError> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(PROJECT_PK.to_string()))
        .key("SK", AttributeValue::S(project_sk(project_id)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB delete_item error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_from_item_reads_sk_id() {
        let mut item = Item::new();
        item.insert("PK".to_string(), AttributeValue::S("PROJECT".to_string()));
        item.insert(
            "SK".to_string(),
            AttributeValue::S("PROJECT#p-1".to_string()),
        );
        item.insert("title".to_string(), AttributeValue::S("Billing".to_string()));
        item.insert(
            "description".to_string(),
            AttributeValue::S("Invoices and ledgers".to_string()),
        );
        let project = project_from_item(&item).expect("parse");
        assert_eq!(project.project_id, "p-1");
        assert_eq!(project.title, "Billing");
        assert!(project.member_ids.is_empty());
    }

    #[test]
    fn foreign_sk_is_rejected() {
        let mut item = Item::new();
        item.insert("SK".to_string(), AttributeValue::S("USER#u-1".to_string()));
        assert!(project_from_item(&item).is_none());
    }
}
