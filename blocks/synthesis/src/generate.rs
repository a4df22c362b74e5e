use aws_sdk_dynamodb::Client as DynamoClient;
use lambda_http::{http::StatusCode, Body, Error, Response};
use serde::Deserialize;

use taskforge_atoms::error::{error_response, ApiError};
use taskforge_atoms::tasks::model::Task;
use taskforge_atoms::tasks::service::{put_tasks_batch, TRANSACT_MAX_ITEMS};
use taskforge_atoms::users::service::list_developers;

use crate::gemini::GeminiClient;
use crate::parse;
use crate::prompt;

#[derive(Debug, Deserialize)]
pub struct SrsPayload {
    pub srs_text: String,
    pub project_id: String,
}

/// POST /admin/generate-tasks - break an SRS document into a batch of
/// unapproved tasks and persist them atomically.
pub async fn generate_tasks(
    dynamo: &DynamoClient,
    gemini: &GeminiClient,
    table_name: &str,
    admin_email: &str,
    body: &[u8],
) -> Result<Response<Body>, Error> {
    let req: SrsPayload = match serde_json::from_slice(body) {
        Ok(p) => p,
        Err(e) => return error_response(&ApiError::Validation(format!("Invalid body: {}", e))),
    };

    let developers = match list_developers(dynamo, table_name).await {
        Ok(d) => d,
        Err(e) => return error_response(&e),
    };

    let rendered = prompt::build_prompt(&req.srs_text, &developers);
    tracing::info!(
        "Sending SRS prompt to Gemini ({} developers in roster)",
        developers.len()
    );

    let raw = match gemini.generate_content(&rendered).await {
        Ok(text) => text,
        Err(e) => return error_response(&e),
    };

    let drafts = match parse::parse_generated_tasks(&raw) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!("Gemini response was not a valid JSON task array");
            return error_response(&e);
        }
    };

    // One transaction is the whole atomicity story; a batch past the
    // DynamoDB ceiling cannot be committed all-or-nothing, so it is
    // rejected before any write.
    if drafts.len() > TRANSACT_MAX_ITEMS {
        return error_response(&ApiError::InvalidAiResponse(format!(
            "{} tasks exceed the {}-item batch limit",
            drafts.len(),
            TRANSACT_MAX_ITEMS
        )));
    }

    let tasks: Vec<Task> = drafts
        .into_iter()
        .map(|draft| parse::build_task(draft, &req.project_id, admin_email))
        .collect();

    if let Err(e) = put_tasks_batch(dynamo, table_name, &tasks).await {
        return error_response(&e);
    }

    tracing::info!("Generated and saved {} tasks from SRS", tasks.len());

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(
            serde_json::json!({
                "message": format!("Successfully generated and saved {} tasks.", tasks.len()),
                "tasks": tasks,
            })
            .to_string()
            .into(),
        )
        .map_err(Box::new)?)
}

/// GET /admin/list-models - the generateContent-capable models visible to
/// the configured API key.
pub async fn list_models(gemini: &GeminiClient) -> Result<Response<Body>, Error> {
    let models = match gemini.list_models().await {
        Ok(m) => m,
        Err(e) => return error_response(&e),
    };

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(serde_json::json!({"models": models}).to_string().into())
        .map_err(Box::new)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srs_payload_requires_both_fields() {
        let ok: SrsPayload =
            serde_json::from_str(r#"{"srs_text": "Build X", "project_id": "p-1"}"#).unwrap();
        assert_eq!(ok.project_id, "p-1");

        assert!(serde_json::from_str::<SrsPayload>(r#"{"srs_text": "Build X"}"#).is_err());
    }
}
