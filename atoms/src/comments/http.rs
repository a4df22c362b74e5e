use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::CreateCommentPayload;
use super::service;
use crate::error::{error_response, ApiError};
use crate::users;

/// POST /tasks/{id}/comments - task access is checked by the router before
/// this runs. The author name is resolved from the profile at post time.
pub async fn create_comment(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    author_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateCommentPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let author_name = match users::service::find_user(client, table_name, author_id).await {
        Ok(Some(user)) => user.user_name,
        Ok(None) => "Unknown User".to_string(),
        Err(e) => return error_response(&e),
    };

    let comment = match service::create_comment(
        client,
        table_name,
        task_id,
        author_id,
        &author_name,
        req.text,
    )
    .await
    {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&comment)?.into())
        .map_err(Box::new)?)
}

/// GET /tasks/{id}/comments
pub async fn list_comments(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    let comments = match service::list_comments(client, table_name, task_id).await {
        Ok(c) => c,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&comments)?.into())
        .map_err(Box::new)?)
}
