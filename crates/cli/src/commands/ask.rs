//! Ask command handler.
//!
//! Runs the same answer pipeline as `POST /api/ask`, once, from the shell.

use anyhow::Context;
use clap::Args;
use localaid_core::AppConfig;
use localaid_server::{answer_question, AppState};

/// Answer one question from the shell
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: String,

    /// Preferred town
    #[arg(short, long)]
    pub town: Option<String>,

    /// Output as JSON ({ answer, sources })
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        tracing::debug!("Ask command options: {:?}", self);

        let state = AppState::from_config(config).context("Failed to load directory")?;
        let response = answer_question(&state, Some(self.question.as_str()), self.town.as_deref()).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
            return Ok(());
        }

        println!("{}", response.answer);
        if !response.sources.is_empty() {
            println!();
            println!("Sources:");
            for source in &response.sources {
                println!("  - {} ({}, {}) {}", source.name, source.category, source.town, source.url);
            }
        }

        Ok(())
    }
}
