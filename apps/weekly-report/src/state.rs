use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Client built from `OPENAI_API_KEY`; handlers swap in a per-request key when one is sent.
    pub llm: LlmClient,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_base_url.clone());
        Self { config, llm }
    }
}
