use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::{Role, User};
use crate::error::ApiError;
use crate::item::{string_attr, string_list_attr, string_list_value, Item};

/// Profiles are a listable entity:
/// PK = "USER", SK = "USER#{user_id}"
const USER_PK: &str = "USER";

fn user_sk(user_id: &str) -> String {
    format!("USER#{}", user_id)
}

pub fn user_from_item(item: &Item) -> Option<User> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    let user_id = sk.strip_prefix("USER#")?.to_string();
    Some(User {
        user_id,
        user_name: string_attr(item, "user_name"),
        user_email: string_attr(item, "user_email"),
        // Unknown stored roles read back as developer, the default persona
        user_role: item
            .get("user_role")
            .and_then(|v| v.as_s().ok())
            .and_then(|s| Role::parse(s))
            .unwrap_or(Role::Developer),
        skills: string_list_attr(item, "skills"),
        user_created_at: string_attr(item, "user_created_at"),
    })
}

pub fn user_item(user: &User) -> Item {
    let mut item = Item::new();
    item.insert("PK".to_string(), AttributeValue::S(USER_PK.to_string()));
    item.insert("SK".to_string(), AttributeValue::S(user_sk(&user.user_id)));
    item.insert(
        "user_name".to_string(),
        AttributeValue::S(user.user_name.clone()),
    );
    item.insert(
        "user_email".to_string(),
        AttributeValue::S(user.user_email.clone()),
    );
    item.insert(
        "user_role".to_string(),
        AttributeValue::S(user.user_role.as_str().to_string()),
    );
    item.insert("skills".to_string(), string_list_value(&user.skills));
    item.insert(
        "user_created_at".to_string(),
        AttributeValue::S(user.user_created_at.clone()),
    );
    item
}

pub async fn find_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Option<User>, ApiError> {
    let result = client
        .get_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(USER_PK.to_string()))
        .key("SK", AttributeValue::S(user_sk(user_id)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB get_item error: {}", e)))?;

    Ok(result.item().and_then(user_from_item))
}

pub async fn get_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<User, ApiError> {
    find_user(client, table_name, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

/// Persist a full profile document. Used for first-sight creation during
/// authentication; overwrites any existing document with the same id.
pub async fn put_user(
    client: &DynamoClient,
    table_name: &str,
    user: &User,
) -> Result<(), ApiError> {
    client
        .put_item()
        .table_name(table_name)
        .set_item(Some(user_item(user)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB put_item error: {}", e)))?;

    Ok(())
}

pub async fn list_users(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<User>, ApiError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(USER_PK.to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("USER#".to_string()))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB query error: {}", e)))?;

    Ok(result.items().iter().filter_map(user_from_item).collect())
}

/// The developer roster: every profile whose role is exactly `developer`.
pub async fn list_developers(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Vec<User>, ApiError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .filter_expression("user_role = :role")
        .expression_attribute_values(":pk", AttributeValue::S(USER_PK.to_string()))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("USER#".to_string()))
        .expression_attribute_values(
            ":role",
            AttributeValue::S(Role::Developer.as_str().to_string()),
        )
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB query error: {}", e)))?;

    Ok(result.items().iter().filter_map(user_from_item).collect())
}

pub async fn update_role(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    role: Role,
) -> Result<(), ApiError> {
    update_profile_field(
        client,
        table_name,
        user_id,
        "user_role",
        AttributeValue::S(role.as_str().to_string()),
    )
    .await
}

pub async fn update_skills(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    skills: &[String],
) -> Result<(), ApiError> {
    update_profile_field(
        client,
        table_name,
        user_id,
        "skills",
        string_list_value(skills),
    )
    .await
}

/// The identity provider is the source of truth for email; this corrects a
/// drifted profile in place during session hydration.
pub async fn update_email(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    email: &str,
) -> Result<(), ApiError> {
    update_profile_field(
        client,
        table_name,
        user_id,
        "user_email",
        AttributeValue::S(email.to_string()),
    )
    .await
}

async fn update_profile_field(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    field: &str,
    value: AttributeValue,
) -> Result<(), ApiError> {
    client
        .update_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(USER_PK.to_string()))
        .key("SK", AttributeValue::S(user_sk(user_id)))
        // Update must not materialize a phantom profile for an unknown id
        .condition_expression("attribute_exists(PK)")
        .update_expression("SET #field = :value")
        .expression_attribute_names("#field", field)
        .expression_attribute_values(":value", value)
        .send()
        .await
        .map_err(|e| {
            let not_found = e
                .as_service_error()
                .map(|se| se.is_conditional_check_failed_exception())
                .unwrap_or(false);
            if not_found {
                ApiError::NotFound("User not found".to_string())
            } else {
                ApiError::Store(format!("DynamoDB update_item error: {}", e))
            }
        })?;

    Ok(())
}

/// Delete only the profile document. Revoking the external identity is the
/// caller's second leg (see taskforge-shared accounts).
pub async fn delete_user(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<(), ApiError> {
    client
        .delete_item()
        .table_name(table_name)
        .key("PK", AttributeValue::S(USER_PK.to_string()))
        .key("SK", AttributeValue::S(user_sk(user_id)))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB delete_item error: {}", e)))?;

    Ok(())
}
