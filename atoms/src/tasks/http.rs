use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{CreateTaskPayload, UpdateStatusPayload};
use super::service;
use crate::error::{error_response, ApiError};

/// GET /admin/tasks - every task from every project, newest first
pub async fn list_all_tasks(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    let tasks = match service::list_all_tasks(client, table_name).await {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&tasks)?.into())
        .map_err(Box::new)?)
}

/// POST /admin/tasks - manual creation, approved immediately
pub async fn create_task(
    client: &DynamoClient,
    table_name: &str,
    admin_email: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateTaskPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let task = match service::create_task(client, table_name, admin_email, req).await {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&task)?.into())
        .map_err(Box::new)?)
}

/// PUT /admin/tasks/{id} - full-field overwrite
pub async fn update_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateTaskPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let task = match service::update_task(client, table_name, task_id, req).await {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&task)?.into())
        .map_err(Box::new)?)
}

/// PUT /admin/tasks/{id}/approve - idempotent approval gate flip
pub async fn approve_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    let task = match service::approve_task(client, table_name, task_id).await {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&task)?.into())
        .map_err(Box::new)?)
}

/// DELETE /admin/tasks/{id} - no comment cascade
pub async fn delete_task(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
) -> Result<Response<Body>, Error> {
    if let Err(e) = service::delete_task(client, table_name, task_id).await {
        return error_response(&e);
    }

    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Empty)
        .map_err(Box::new)?)
}

/// PUT /tasks/{id}/status - the router has already run the task-access
/// check for the caller
pub async fn update_task_status(
    client: &DynamoClient,
    table_name: &str,
    task_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: UpdateStatusPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let task = match service::update_status(client, table_name, task_id, req.status).await {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&task)?.into())
        .map_err(Box::new)?)
}

/// GET /tasks/my - assigned to the caller and through the approval gate
pub async fn list_my_tasks(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Response<Body>, Error> {
    let tasks = match service::list_tasks_for_assignee(client, table_name, user_id).await {
        Ok(t) => t,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&tasks)?.into())
        .map_err(Box::new)?)
}
