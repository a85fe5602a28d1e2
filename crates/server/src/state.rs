//! Shared, read-only application state.

use localaid_core::{AppConfig, AppResult};
use localaid_directory::Directory;
use localaid_llm::{client_factory, ClientSettings, Generator};
use localaid_prompt::{resolve_prompt, PromptDefinition};
use std::sync::Arc;

/// Everything a request needs. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<Directory>,
    pub prompt: Arc<PromptDefinition>,
    pub generator: Option<Arc<Generator>>,
}

impl AppState {
    pub fn new(directory: Directory, prompt: PromptDefinition, generator: Option<Generator>) -> Self {
        Self {
            directory: Arc::new(directory),
            prompt: Arc::new(prompt),
            generator: generator.map(Arc::new),
        }
    }

    /// Load the directory, resolve the prompt, and bind the generator.
    ///
    /// An unreadable directory leaves the state empty rather than failing, so
    /// the server still starts and reports 503. Without an API key answers
    /// come from the fallback composer.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let directory = match Directory::load(&config.data_path(), &config.index_path()) {
            Ok(directory) => directory,
            Err(e) => {
                tracing::error!("Failed to load directory, serving with no data: {}", e);
                Directory::default()
            }
        };
        let prompt = resolve_prompt(config.prompt_file.as_deref())?;

        let generator = if config.api_key.is_some() {
            Generator::init(client_factory(ClientSettings::from_config(config)), &config.model)
        } else {
            tracing::warn!("GEMINI_API_KEY is not set; answers will use the directory fallback");
            None
        };

        Ok(Self::new(directory, prompt, generator))
    }

    /// Model currently used for generation, if any.
    pub async fn model_name(&self) -> Option<String> {
        match &self.generator {
            Some(generator) => Some(generator.current_model().await),
            None => None,
        }
    }
}
