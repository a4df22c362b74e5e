use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};

use taskforge_atoms::error::{error_response, ApiError};
use taskforge_atoms::users::service as users;

/// DELETE /admin/users/{id} - remove the profile document AND revoke the
/// external identity. Both legs are attempted regardless of the other's
/// outcome; the first failure is the one surfaced.
pub async fn delete_account(
    dynamo: &DynamoClient,
    cognito: &CognitoClient,
    table_name: &str,
    user_pool_id: &str,
    user_id: &str,
) -> Result<Response<Body>, Error> {
    let profile_result = users::delete_user(dynamo, table_name, user_id).await;

    let identity_result = cognito
        .admin_delete_user()
        .user_pool_id(user_pool_id)
        .username(user_id)
        .send()
        .await
        .map(|_| ())
        .map_err(|e| {
            let missing = e
                .as_service_error()
                .map(|se| se.is_user_not_found_exception())
                .unwrap_or(false);
            if missing {
                ApiError::NotFound("User not found in identity provider".to_string())
            } else {
                ApiError::Store(format!("Cognito admin_delete_user error: {}", e))
            }
        });

    if let Err(e) = profile_result.and(identity_result) {
        return error_response(&e);
    }

    Ok(Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Empty)
        .map_err(Box::new)?)
}
