//! The answer pipeline: retrieve, prompt, generate, fall back.

use crate::state::AppState;
use localaid_core::{AppError, AppResult};
use localaid_directory::{compose_fallback, retrieve, ServiceRecord};
use localaid_prompt::build_prompt;
use serde::Serialize;

pub const MISSING_QUESTION: &str = "Missing question";
pub const NO_DATA: &str = "No data loaded. Run the ingestion script.";

/// Answer text plus the records it was grounded on.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<ServiceRecord>,

    /// Whether the answer came from the generator rather than the fallback.
    #[serde(skip)]
    pub generated: bool,
}

/// Answer one question against the loaded directory.
///
/// Generation failures never surface here: they are logged and the
/// fallback composer answers instead.
///
/// # Errors
/// - `AppError::Input` when the question is missing or blank
/// - `AppError::DataUnavailable` when no records are loaded
/// - `AppError::Prompt` when the prompt template cannot be rendered
pub async fn answer_question(
    state: &AppState,
    question: Option<&str>,
    town_pref: Option<&str>,
) -> AppResult<AnswerResponse> {
    let question = question
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::Input(MISSING_QUESTION.to_string()))?;

    if state.directory.is_empty() {
        return Err(AppError::DataUnavailable(NO_DATA.to_string()));
    }

    let town_pref = town_pref.map(str::trim).filter(|t| !t.is_empty());

    let scored = retrieve(state.directory.records(), question, town_pref);
    let prompt = build_prompt(&state.prompt, question, town_pref, &scored)?;
    tracing::debug!(
        "Prompt built from {} records ({} chars)",
        prompt.metadata.record_count,
        prompt.text.len()
    );

    let generated = match &state.generator {
        Some(generator) => match generator.generate(&prompt.text).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Generation failed, using fallback: {}", e);
                None
            }
        },
        None => None,
    };

    let (answer, generated) = match generated {
        Some(text) => (text, true),
        None => (compose_fallback(&scored, question, town_pref), false),
    };

    tracing::info!(
        "Answered with {} sources (generated: {})",
        scored.len(),
        generated
    );

    Ok(AnswerResponse {
        answer,
        sources: scored.into_iter().map(|s| s.record).collect(),
        generated,
    })
}
