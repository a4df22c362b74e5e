use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::CreateProjectPayload;
use super::service;
use crate::error::{error_response, ApiError};

/// POST /projects
pub async fn create_project(
    client: &DynamoClient,
    table_name: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateProjectPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let project = match service::create_project(client, table_name, req).await {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&project)?.into())
        .map_err(Box::new)?)
}

/// GET /projects
pub async fn list_projects(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    let projects = match service::list_projects(client, table_name).await {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&projects)?.into())
        .map_err(Box::new)?)
}

/// GET /projects/{id}
pub async fn get_project(
    client: &DynamoClient,
    table_name: &str,
    project_id: &str,
) -> Result<Response<Body>, Error> {
    let project = match service::get_project(client, table_name, project_id).await {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&project)?.into())
        .map_err(Box::new)?)
}

/// PUT /projects/{id}
pub async fn update_project(
    client: &DynamoClient,
    table_name: &str,
    project_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: CreateProjectPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let project = match service::update_project(client, table_name, project_id, req).await {
        Ok(p) => p,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&project)?.into())
        .map_err(Box::new)?)
}

/// DELETE /projects/{id}
pub async fn delete_project(
    client: &DynamoClient,
    table_name: &str,
    project_id: &str,
) -> Result<Response<Body>, Error> {
    if let Err(e) = service::delete_project(client, table_name, project_id).await {
        return error_response(&e);
    }

    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Empty)
        .map_err(Box::new)?)
}
