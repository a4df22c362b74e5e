use serde::Deserialize;
use std::time::Duration;

use taskforge_atoms::error::ApiError;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The model call is the only long-running operation in the system; past
/// this deadline the request fails as Unavailable with no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Thin client for the Gemini REST API.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
struct ContentPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
    #[serde(default, rename = "supportedGenerationMethods")]
    supported_generation_methods: Vec<String>,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Unavailable(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model,
        })
    }

    /// One prompt in, the first candidate's text out.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, ApiError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, self.model, self.api_key
        );
        let body = serde_json::json!({
            "contents": [{"parts": [{"text": prompt}]}]
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Unavailable(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Unavailable(format!(
                "Gemini request failed with status {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Unavailable(format!("Failed to parse Gemini response: {}", e)))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| ApiError::InvalidAiResponse("empty candidate list".to_string()))
    }

    /// Names of the models that can serve generateContent.
    pub async fn list_models(&self) -> Result<Vec<String>, ApiError> {
        let url = format!("{}/models?key={}", GEMINI_BASE_URL, self.api_key);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Unavailable(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ApiError::Unavailable(format!(
                "Gemini request failed with status {}: {}",
                status, detail
            )));
        }

        let parsed: ListModelsResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Unavailable(format!("Failed to parse Gemini response: {}", e)))?;

        Ok(parsed
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_content_response_shape_parses() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "[]"}], "role": "model"}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].content.parts[0].text, "[]");
    }

    #[test]
    fn list_models_response_filters_on_generation_method() {
        let raw = r#"{
            "models": [
                {"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}
            ]
        }"#;
        let parsed: ListModelsResponse = serde_json::from_str(raw).unwrap();
        let usable: Vec<_> = parsed
            .models
            .into_iter()
            .filter(|m| {
                m.supported_generation_methods
                    .iter()
                    .any(|method| method == "generateContent")
            })
            .map(|m| m.name)
            .collect();
        assert_eq!(usable, vec!["models/gemini-pro".to_string()]);
    }
}
