//! Gemini LLM provider implementation.
//!
//! Talks to the Google generative-language REST API:
//! `POST {endpoint}/v1beta/models/{model}:generateContent`.

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use localaid_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API request format.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini API response format.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Gemini LLM client bound to one model.
pub struct GeminiClient {
    /// Base URL for the API
    base_url: String,

    /// API credential
    api_key: String,

    /// Model identifier (e.g., "gemini-2.0-flash")
    model: String,

    /// HTTP client
    client: reqwest::Client,
}

impl GeminiClient {
    /// Create a client for `model`.
    ///
    /// # Errors
    /// Returns `AppError::Config` for an empty API key, an empty or malformed
    /// model name, or when the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let api_key = api_key.into();
        let model = model.into();

        if api_key.trim().is_empty() {
            return Err(AppError::Config("Gemini provider requires an API key".to_string()));
        }

        if model.trim().is_empty() || model.contains('/') || model.contains(char::is_whitespace) {
            return Err(AppError::Config(format!("Invalid Gemini model name: '{}'", model)));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            model,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Convert LlmRequest to Gemini format.
    fn to_gemini_request(&self, request: &LlmRequest) -> GenerateContentRequest {
        let generation_config = if request.temperature.is_some() || request.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: request.temperature,
                max_output_tokens: request.max_tokens,
            })
        } else {
            None
        };

        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: request.prompt.clone(),
                }],
            }],
            generation_config,
        }
    }

    /// Convert Gemini response to LlmResponse.
    fn convert_response(&self, response: GenerateContentResponse) -> AppResult<LlmResponse> {
        let content: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().map(|p| p.text).collect())
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(AppError::Generation(
                "Gemini returned no text in the first candidate".to_string(),
            ));
        }

        let usage = response
            .usage_metadata
            .map(|u| LlmUsage::new(u.prompt_token_count, u.candidates_token_count))
            .unwrap_or_default();

        Ok(LlmResponse {
            content: content.trim().to_string(),
            model: response.model_version.unwrap_or_else(|| self.model.clone()),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmClient for GeminiClient {
    fn provider_name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::info!("Sending completion request to Gemini ({})", self.model);
        tracing::debug!("Prompt length: {} chars", request.prompt.len());

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&self.to_gemini_request(request))
            .send()
            .await
            .map_err(|e| {
                let kind = if e.is_timeout() { "timed out" } else { "failed" };
                AppError::Generation(format!("Request to Gemini {}: {}", kind, e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Generation(format!(
                "Gemini API error ({}): {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::Generation(format!("Failed to parse Gemini response: {}", e)))?;

        let converted = self.convert_response(body)?;

        tracing::info!("Received completion from Gemini");
        tracing::debug!(
            "Token usage - Prompt: {}, Completion: {}, Total: {}",
            converted.usage.prompt_tokens,
            converted.usage.completion_tokens,
            converted.usage.total_tokens
        );

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer, model: &str) -> GeminiClient {
        GeminiClient::new(server.base_url(), "test-key", model, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_client_requires_api_key() {
        let result = GeminiClient::new("http://localhost", " ", "gemini-2.0-flash", Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_client_rejects_bad_model_names() {
        for model in ["", "models/gemini", "gemini flash"] {
            let result = GeminiClient::new("http://localhost", "key", model, Duration::from_secs(1));
            assert!(result.is_err(), "model {:?} should be rejected", model);
        }
    }

    #[test]
    fn test_request_conversion() {
        let client =
            GeminiClient::new("http://localhost/", "key", "gemini-2.0-flash", Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            client.url(),
            "http://localhost/v1beta/models/gemini-2.0-flash:generateContent"
        );

        let plain = serde_json::to_value(client.to_gemini_request(&LlmRequest::new("Hi"))).unwrap();
        assert_eq!(plain["contents"][0]["parts"][0]["text"], "Hi");
        assert_eq!(plain["contents"][0]["role"], "user");
        assert!(plain.get("generationConfig").is_none());

        let tuned = serde_json::to_value(
            client.to_gemini_request(&LlmRequest::new("Hi").with_max_tokens(200)),
        )
        .unwrap();
        assert_eq!(tuned["generationConfig"]["maxOutputTokens"], 200);
        assert!(tuned["generationConfig"].get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_complete_joins_candidate_parts() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/v1beta/models/gemini-2.0-flash:generateContent")
                    .header("x-goog-api-key", "test-key")
                    .body_contains("Who delivers meals?");
                then.status(200).json_body(json!({
                    "candidates": [{
                        "content": {
                            "role": "model",
                            "parts": [{"text": "Senior Meals Co delivers "}, {"text": "hot lunches."}]
                        },
                        "finishReason": "STOP"
                    }],
                    "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 8, "totalTokenCount": 48}
                }));
            })
            .await;

        let client = client_for(&server, "gemini-2.0-flash");
        let response = client
            .complete(&LlmRequest::new("Who delivers meals?"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.content, "Senior Meals Co delivers hot lunches.");
        assert_eq!(response.model, "gemini-2.0-flash");
        assert_eq!(response.usage.total_tokens, 48);
    }

    #[tokio::test]
    async fn test_not_found_status_is_classified() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/v1beta/models/gemini-old:generateContent");
                then.status(404).json_body(json!({
                    "error": {
                        "code": 404,
                        "message": "models/gemini-old is not found for API version v1beta",
                        "status": "NOT_FOUND"
                    }
                }));
            })
            .await;

        let client = client_for(&server, "gemini-old");
        let err = client.complete(&LlmRequest::new("hi")).await.unwrap_err();

        assert!(matches!(err, AppError::Generation(_)));
        assert!(err.is_model_not_found());
    }

    #[tokio::test]
    async fn test_server_error_is_not_model_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(500).body("backend unavailable");
            })
            .await;

        let client = client_for(&server, "gemini-2.0-flash");
        let err = client.complete(&LlmRequest::new("hi")).await.unwrap_err();

        assert!(err.to_string().contains("500"));
        assert!(!err.is_model_not_found());
    }

    #[tokio::test]
    async fn test_empty_candidates_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(200).json_body(json!({"candidates": []}));
            })
            .await;

        let client = client_for(&server, "gemini-2.0-flash");
        let err = client.complete(&LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, AppError::Generation(_)));
    }
}
