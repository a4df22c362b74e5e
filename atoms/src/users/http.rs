use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use super::model::{UpdateRolePayload, UpdateSkillsPayload};
use super::service;
use crate::error::{error_response, ApiError};

/// GET /users/me - the authenticated caller's own profile
pub async fn get_me(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
) -> Result<Response<Body>, Error> {
    let user = match service::get_user(client, table_name, user_id).await {
        Ok(u) => u,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&user)?.into())
        .map_err(Box::new)?)
}

/// GET /admin/users - every profile, for the admin dashboard
pub async fn list_users(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    let users = match service::list_users(client, table_name).await {
        Ok(u) => u,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&users)?.into())
        .map_err(Box::new)?)
}

/// GET /admin/developers - the developer roster with skills
pub async fn list_developers(
    client: &DynamoClient,
    table_name: &str,
) -> Result<Response<Body>, Error> {
    let developers = match service::list_developers(client, table_name).await {
        Ok(u) => u,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::to_string(&developers)?.into())
        .map_err(Box::new)?)
}

/// PUT /admin/users/{id}/role - promote or demote a user
pub async fn update_user_role(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: UpdateRolePayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    if let Err(e) = service::update_role(client, table_name, user_id, req.role).await {
        return error_response(&e);
    }

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"message": "Role updated successfully"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

/// PUT /users/me/skills - a developer maintaining their own skill list
pub async fn update_my_skills(
    client: &DynamoClient,
    table_name: &str,
    user_id: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: UpdateSkillsPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    if let Err(e) = service::update_skills(client, table_name, user_id, &req.skills).await {
        return error_response(&e);
    }

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"skills": req.skills}).to_string().into())
        .map_err(Box::new)?)
}
