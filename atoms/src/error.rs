use lambda_http::http::StatusCode;
use lambda_http::{Body, Error, Response};
use thiserror::Error;

/// Failure taxonomy for every request handler. Each variant maps to exactly
/// one HTTP status; handlers surface these directly with no retries.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("AI returned an invalid response: {0}")]
    InvalidAiResponse(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Store(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::InvalidAiResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render an ApiError as the JSON error body every route uses.
pub fn error_response(err: &ApiError) -> Result<Response<Body>, Error> {
    if matches!(err, ApiError::Store(_) | ApiError::Unavailable(_)) {
        tracing::error!("request failed: {}", err);
    }
    Ok(Response::builder()
        .status(err.status())
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({"error": err.to_string()})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Unauthenticated("x".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidAiResponse("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Unavailable("x".into()).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError::Store("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_ai_response_message_is_prefixed() {
        let err = ApiError::InvalidAiResponse("not json".into());
        assert_eq!(err.to_string(), "AI returned an invalid response: not json");
    }
}
