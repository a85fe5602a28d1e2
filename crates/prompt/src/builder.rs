//! Prompt builder for rendering the answer template.

use crate::types::{BuiltPrompt, PromptDefinition};
use handlebars::Handlebars;
use localaid_core::{AppError, AppResult};
use localaid_directory::{ScoredRecord, ServiceRecord};
use std::collections::HashMap;

/// Rendered in place of the directory section when nothing matched.
pub const NO_MATCHES: &str = "(no matches)";

/// Build the model input for one question.
///
/// This function:
/// 1. Renders the guardrails as a bulleted block
/// 2. Renders one line per retrieved record
/// 3. Fills the definition's Handlebars template with the question and
///    optional town preference
///
/// # Arguments
/// * `definition` - Prompt definition (built-in or loaded from YAML)
/// * `question` - The user's question, verbatim
/// * `town_pref` - Optional town preference; blank counts as none
/// * `scored` - Retrieved records in rank order
///
/// # Example
/// ```no_run
/// use localaid_prompt::{build_prompt, default_prompt};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let def = default_prompt()?;
/// let built = build_prompt(&def, "Where can I get lunch?", Some("Linden"), &[])?;
/// println!("{}", built.text);
/// # Ok(())
/// # }
/// ```
pub fn build_prompt(
    definition: &PromptDefinition,
    question: &str,
    town_pref: Option<&str>,
    scored: &[ScoredRecord],
) -> AppResult<BuiltPrompt> {
    tracing::debug!("Building prompt: {}", definition.id);

    let town_pref = town_pref
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string);

    let mut variables = HashMap::new();
    variables.insert("tone".to_string(), definition.behavior.tone.clone());
    variables.insert("style".to_string(), definition.behavior.style.clone());
    variables.insert("guardrails".to_string(), render_guardrails(&definition.guardrails));
    variables.insert("question".to_string(), question.to_string());
    variables.insert("townPref".to_string(), town_pref.clone().unwrap_or_default());
    variables.insert("directory".to_string(), render_directory(scored));

    let text = render_template(&definition.template, &variables)?;

    Ok(BuiltPrompt::new(
        text,
        definition.id.clone(),
        scored.len(),
        town_pref,
    ))
}

/// Render a Handlebars template with variables.
fn render_template(template: &str, variables: &HashMap<String, String>) -> AppResult<String> {
    let mut handlebars = Handlebars::new();

    // Disable HTML escaping for plain text
    handlebars.register_escape_fn(handlebars::no_escape);

    handlebars
        .register_template_string("prompt", template)
        .map_err(|e| AppError::Prompt(format!("Failed to register template: {}", e)))?;

    let rendered = handlebars
        .render("prompt", variables)
        .map_err(|e| AppError::Prompt(format!("Failed to render template: {}", e)))?;

    Ok(rendered)
}

fn render_guardrails(guardrails: &[String]) -> String {
    guardrails
        .iter()
        .map(|g| format!("- {}", g))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render the directory section, one line per record.
pub fn render_directory(scored: &[ScoredRecord]) -> String {
    if scored.is_empty() {
        return NO_MATCHES.to_string();
    }

    scored
        .iter()
        .map(|s| render_record(&s.record))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render one record; empty address, areas, link and notes are left out.
fn render_record(record: &ServiceRecord) -> String {
    let mut fields = vec![
        format!("[{}] {}", record.category, or_na(&record.name)),
        format!("Phone: {}", or_na(&record.phone)),
    ];

    if !record.address.is_empty() {
        fields.push(format!("Address: {}", record.address));
    }
    fields.push(format!("Hours: {}", or_na(&record.hours)));
    if !record.area.is_empty() {
        fields.push(format!("Areas: {}", record.area.join(", ")));
    }
    if !record.url.is_empty() {
        fields.push(format!("Link: {}", record.url));
    }
    if !record.notes.is_empty() {
        fields.push(format!("Notes: {}", record.notes));
    }

    format!("- {}", fields.join(" | "))
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}
