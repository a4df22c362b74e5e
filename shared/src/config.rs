use lambda_http::Error;
use std::env;

/// Environment configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub table_name: String,
    pub user_pool_id: String,
    /// Absent means AI task generation is disabled, not a startup failure.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, Error> {
        let table_name = env::var("TABLE_NAME").unwrap_or_else(|_| "taskforge".to_string());
        let user_pool_id = env::var("COGNITO_USER_POOL_ID")
            .map_err(|_| Error::from("COGNITO_USER_POOL_ID must be set"))?;
        let gemini_api_key = env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| "models/gemini-pro-latest".to_string());

        if gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set - AI task generation is disabled");
        }

        Ok(Self {
            table_name,
            user_pool_id,
            gemini_api_key,
            gemini_model,
        })
    }
}
