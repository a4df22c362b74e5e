pub mod accounts;
pub mod auth;
pub mod config;

pub use config::EnvConfig;

use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use aws_sdk_dynamodb::Client as DynamoClient;
use synthesis_block::GeminiClient;

/// Immutable per-process state shared across request handlers. Handlers hold
/// no mutable state of their own; DynamoDB is the only shared resource.
pub struct AppState {
    pub dynamo_client: DynamoClient,
    pub cognito_client: CognitoClient,
    /// None when GEMINI_API_KEY is absent; AI routes answer 503 in that case.
    pub gemini: Option<GeminiClient>,
    pub config: EnvConfig,
}

impl AppState {
    pub fn new(
        sdk_config: &aws_config::SdkConfig,
        config: EnvConfig,
    ) -> Result<Self, lambda_http::Error> {
        let gemini = match &config.gemini_api_key {
            Some(api_key) => Some(GeminiClient::new(
                api_key.clone(),
                config.gemini_model.clone(),
            )?),
            None => None,
        };

        Ok(Self {
            dynamo_client: DynamoClient::new(sdk_config),
            cognito_client: CognitoClient::new(sdk_config),
            gemini,
            config,
        })
    }
}
