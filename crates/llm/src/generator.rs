//! Answer generation with a one-shot fallback to the default model.
//!
//! The generator owns a [`ModelBinding`] (model name plus a client bound to
//! it). When the bound model is reported missing, the binding is replaced
//! with one for [`DEFAULT_MODEL`] and the call is retried once. Bindings are
//! swapped whole and never mutated in place.

use crate::client::{LlmClient, LlmRequest};
use crate::factory::ClientFactory;
use localaid_core::{AppError, AppResult, DEFAULT_MODEL};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Sampling temperature for directory answers.
const ANSWER_TEMPERATURE: f32 = 0.3;

/// Output cap for a 2-4 sentence answer.
const ANSWER_MAX_TOKENS: u32 = 400;

/// A model name together with the client that talks to it.
pub struct ModelBinding {
    pub model: String,
    pub client: Arc<dyn LlmClient>,
}

impl ModelBinding {
    fn build(factory: &ClientFactory, model: &str) -> AppResult<Self> {
        let client = factory(model)?;
        Ok(Self {
            model: model.to_string(),
            client,
        })
    }
}

/// Generates answer text from a prompt.
pub struct Generator {
    factory: ClientFactory,
    binding: RwLock<Arc<ModelBinding>>,
}

impl Generator {
    /// Bind to `configured_model`, falling back once to [`DEFAULT_MODEL`].
    ///
    /// Returns `None` when neither model can be bound (for example, no API
    /// key is configured). Callers then answer without generation.
    pub fn init(factory: ClientFactory, configured_model: &str) -> Option<Self> {
        let binding = match ModelBinding::build(&factory, configured_model) {
            Ok(binding) => binding,
            Err(e) if configured_model != DEFAULT_MODEL => {
                tracing::warn!(
                    "Failed to initialize model '{}': {}; trying '{}'",
                    configured_model,
                    e,
                    DEFAULT_MODEL
                );
                match ModelBinding::build(&factory, DEFAULT_MODEL) {
                    Ok(binding) => binding,
                    Err(e) => {
                        tracing::warn!("Generator disabled: {}", e);
                        return None;
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Generator disabled: {}", e);
                return None;
            }
        };

        tracing::info!(
            "Generator ready ({} / {})",
            binding.client.provider_name(),
            binding.model
        );

        Some(Self {
            factory,
            binding: RwLock::new(Arc::new(binding)),
        })
    }

    /// Name of the model currently bound.
    pub async fn current_model(&self) -> String {
        self.binding.read().await.model.clone()
    }

    /// Generate an answer for `prompt`.
    ///
    /// # Errors
    /// Returns `AppError::Generation` when the service fails, including a
    /// failure of the single retry against the default model.
    pub async fn generate(&self, prompt: &str) -> AppResult<String> {
        let request = LlmRequest::new(prompt)
            .with_temperature(ANSWER_TEMPERATURE)
            .with_max_tokens(ANSWER_MAX_TOKENS);

        // Clone the Arc so the lock is not held across the network call.
        let binding = self.binding.read().await.clone();

        match complete_text(&binding, &request).await {
            Ok(text) => Ok(text),
            Err(e) if e.is_model_not_found() && binding.model != DEFAULT_MODEL => {
                tracing::warn!(
                    "Model '{}' not found ({}); switching to '{}' and retrying",
                    binding.model,
                    e,
                    DEFAULT_MODEL
                );
                let fresh = self.rebind(DEFAULT_MODEL).await?;
                complete_text(&fresh, &request).await
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the current binding with one for `model`.
    async fn rebind(&self, model: &str) -> AppResult<Arc<ModelBinding>> {
        let fresh = ModelBinding::build(&self.factory, model).map_err(|e| {
            AppError::Generation(format!("Failed to rebind to '{}': {}", model, e))
        })?;
        let fresh = Arc::new(fresh);
        *self.binding.write().await = Arc::clone(&fresh);
        Ok(fresh)
    }
}

async fn complete_text(binding: &ModelBinding, request: &LlmRequest) -> AppResult<String> {
    let response = binding
        .client
        .complete(request)
        .await
        .map_err(|e| match e {
            AppError::Generation(_) => e,
            other => AppError::Generation(other.to_string()),
        })?;

    if response.content.trim().is_empty() {
        return Err(AppError::Generation(format!(
            "Model '{}' returned an empty answer",
            binding.model
        )));
    }

    Ok(response.content)
}
