use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;

use super::model::Comment;
use crate::error::ApiError;
use crate::item::{string_attr, Item};

/// Comments nest under their parent task's partition:
/// PK = "TASK#{task_id}", SK = "COMMENT#{timestamp}#{comment_id}"
/// The timestamp prefix in the sort key makes a plain query come back in
/// ascending chronological order.
fn comment_pk(task_id: &str) -> String {
    format!("TASK#{}", task_id)
}

pub fn comment_sk(timestamp: &str, comment_id: &str) -> String {
    format!("COMMENT#{}#{}", timestamp, comment_id)
}

pub fn comment_from_item(item: &Item) -> Option<Comment> {
    let sk = item.get("SK").and_then(|v| v.as_s().ok())?;
    sk.strip_prefix("COMMENT#")?;
    Some(Comment {
        comment_id: string_attr(item, "comment_id"),
        task_id: string_attr(item, "task_id"),
        author_id: string_attr(item, "author_id"),
        author_name: string_attr(item, "author_name"),
        text: string_attr(item, "comment_text"),
        timestamp: string_attr(item, "comment_timestamp"),
    })
}

pub async fn create_comment(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    author_id: &str,
    author_name: &str,
    text: String,
) -> Result<Comment, ApiError> {
    let comment_id = uuid::Uuid::new_v4().to_string();
    let now = chrono::Utc::now().to_rfc3339();

    client
        .put_item()
        .table_name(table_name)
        .item("PK", AttributeValue::S(comment_pk(task_id)))
        .item("SK", AttributeValue::S(comment_sk(&now, &comment_id)))
        .item("comment_id", AttributeValue::S(comment_id.clone()))
        .item("task_id", AttributeValue::S(task_id.to_string()))
        .item("author_id", AttributeValue::S(author_id.to_string()))
        .item("author_name", AttributeValue::S(author_name.to_string()))
        .item("comment_text", AttributeValue::S(text.clone()))
        .item("comment_timestamp", AttributeValue::S(now.clone()))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB put_item error: {}", e)))?;

    Ok(Comment {
        comment_id,
        task_id: task_id.to_string(),
        author_id: author_id.to_string(),
        author_name: author_name.to_string(),
        text,
        timestamp: now,
    })
}

/// Oldest first, straight off the sort key.
pub async fn list_comments(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Vec<Comment>, ApiError> {
    let result = client
        .query()
        .table_name(table_name)
        .key_condition_expression("PK = :pk AND begins_with(SK, :sk_prefix)")
        .expression_attribute_values(":pk", AttributeValue::S(comment_pk(task_id)))
        .expression_attribute_values(":sk_prefix", AttributeValue::S("COMMENT#".to_string()))
        .send()
        .await
        .map_err(|e| ApiError::Store(format!("DynamoDB query error: {}", e)))?;

    Ok(result.items().iter().filter_map(comment_from_item).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_keys_order_comments_chronologically() {
        let first = comment_sk("2026-02-01T08:00:00+00:00", "c-b");
        let second = comment_sk("2026-02-01T09:15:00+00:00", "c-a");
        assert!(first < second);
    }

    #[test]
    fn comment_item_fields_round_trip() {
        let mut item = Item::new();
        item.insert("PK".to_string(), AttributeValue::S("TASK#t-1".to_string()));
        item.insert(
            "SK".to_string(),
            AttributeValue::S(comment_sk("2026-02-01T08:00:00+00:00", "c-1")),
        );
        item.insert("comment_id".to_string(), AttributeValue::S("c-1".to_string()));
        item.insert("task_id".to_string(), AttributeValue::S("t-1".to_string()));
        item.insert("author_id".to_string(), AttributeValue::S("sub-9".to_string()));
        item.insert(
            "author_name".to_string(),
            AttributeValue::S("Ada".to_string()),
        );
        item.insert(
            "comment_text".to_string(),
            AttributeValue::S("Looks good".to_string()),
        );
        item.insert(
            "comment_timestamp".to_string(),
            AttributeValue::S("2026-02-01T08:00:00+00:00".to_string()),
        );

        let comment = comment_from_item(&item).expect("parse");
        assert_eq!(comment.comment_id, "c-1");
        assert_eq!(comment.task_id, "t-1");
        assert_eq!(comment.author_name, "Ada");
        assert_eq!(comment.text, "Looks good");
    }

    #[test]
    fn task_self_record_is_not_a_comment() {
        let mut item = Item::new();
        item.insert("SK".to_string(), AttributeValue::S("TASK#t-1".to_string()));
        assert!(comment_from_item(&item).is_none());
    }
}
