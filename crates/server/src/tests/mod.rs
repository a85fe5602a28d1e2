
pub(crate) mod support {
    use crate::state::AppState;
    use localaid_core::{AppError, AppResult};
    use localaid_directory::{Directory, ServiceRecord};
    use localaid_llm::{ClientFactory, Generator, LlmClient, LlmRequest, LlmResponse, LlmUsage};
    use localaid_prompt::default_prompt;
    use std::sync::Arc;

    #[derive(Clone, Copy)]
    pub enum Outcome {
        Answer(&'static str),
        Fail(&'static str),
        Panic,
    }

    struct FixedClient {
        outcome: Outcome,
    }

    #[async_trait::async_trait]
    impl LlmClient for FixedClient {
        fn provider_name(&self) -> &str {
            "fixed"
        }

        fn model(&self) -> &str {
            "fixed-model"
        }

        async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
            match self.outcome {
                Outcome::Answer(text) => Ok(LlmResponse {
                    content: text.to_string(),
                    model: "fixed-model".to_string(),
                    usage: LlmUsage::default(),
                }),
                Outcome::Fail(message) => Err(AppError::Generation(message.to_string())),
                Outcome::Panic => panic!("client crashed"),
            }
        }
    }

    pub fn generator_with(outcome: Outcome) -> Option<Generator> {
        let factory: ClientFactory = Arc::new(move |_model: &str| {
            let client: Arc<dyn LlmClient> = Arc::new(FixedClient { outcome });
            Ok(client)
        });
        Generator::init(factory, "gemini-2.0-flash")
    }

    pub fn records() -> Vec<ServiceRecord> {
        vec![
            ServiceRecord {
                town: "Linden".to_string(),
                category: "Food".to_string(),
                name: "Senior Meals Co".to_string(),
                phone: "555-0100".to_string(),
                hours: "Mon-Fri 9-5".to_string(),
                url: "https://meals.example.org".to_string(),
                notes: "Hot lunches delivered".to_string(),
                ..Default::default()
            },
            ServiceRecord {
                town: "Linden".to_string(),
                category: "Health".to_string(),
                name: "Linden Clinic".to_string(),
                address: "12 Oak St".to_string(),
                url: "https://clinic.example.org".to_string(),
                ..Default::default()
            },
            ServiceRecord {
                town: "Maple Falls".to_string(),
                category: "Transport".to_string(),
                name: "Ride Share".to_string(),
                url: "https://rides.example.org".to_string(),
                ..Default::default()
            },
        ]
    }

    pub fn sample_state(generator: Option<Generator>) -> AppState {
        AppState::new(
            Directory::from_records(records()),
            default_prompt().unwrap(),
            generator,
        )
    }
}
