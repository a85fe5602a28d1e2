//! LLM provider factory.
//!
//! This module creates LLM clients from provider settings and a model name,
//! and packages that as a reusable [`ClientFactory`] for the generator.

use crate::client::LlmClient;
use crate::providers::GeminiClient;
use crate::types::{ClientSettings, ProviderType};
use localaid_core::{AppError, AppResult};
use std::sync::Arc;
use std::time::Duration;

/// Builds a client bound to the given model name.
pub type ClientFactory = Arc<dyn Fn(&str) -> AppResult<Arc<dyn LlmClient>> + Send + Sync>;

/// Create an LLM client for a provider and model.
///
/// # Arguments
/// * `provider` - Provider identifier ("gemini")
/// * `endpoint` - API base URL
/// * `api_key` - API credential
/// * `model` - Model the client is bound to
/// * `timeout` - Per-request timeout
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown, the API key is
/// missing, or the client cannot be built for `model`.
pub fn create_client(
    provider: &str,
    endpoint: &str,
    api_key: Option<&str>,
    model: &str,
    timeout: Duration,
) -> AppResult<Arc<dyn LlmClient>> {
    match ProviderType::parse(provider) {
        Some(ProviderType::Gemini) => {
            let api_key = api_key.ok_or_else(|| {
                AppError::Config("Gemini provider requires API key".to_string())
            })?;
            let client = GeminiClient::new(endpoint, api_key, model, timeout)?;
            Ok(Arc::new(client))
        }
        None => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}

/// Wrap `settings` in a factory that builds clients on demand.
pub fn client_factory(settings: ClientSettings) -> ClientFactory {
    Arc::new(move |model: &str| {
        create_client(
            &settings.provider,
            &settings.endpoint,
            settings.api_key.as_deref(),
            model,
            settings.timeout,
        )
    })
}
