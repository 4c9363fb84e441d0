/// LLM Client — the single point of entry for AI completion calls.
///
/// Talks to an OpenAI-compatible Chat Completions endpoint. There is no retry
/// loop and no timeout beyond reqwest's defaults: AI Assist is a convenience,
/// and a failure is reported to the user as "unavailable".
use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default model when the request does not name one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("AI assist unavailable: no API key. Set OPENAI_API_KEY or provide api_key in the request.")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid JSON from model: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// One completion call: optional system prompt, a user prompt and a model name.
#[derive(Debug, Clone, Copy)]
pub struct Completion<'a> {
    pub system: Option<&'a str>,
    pub prompt: &'a str,
    pub model: &'a str,
}

/// Anything that can turn a prompt into completion text.
/// `LlmClient` is the production implementation; tests substitute canned responses.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, request: Completion<'_>) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Text of the first choice, trimmed; `None` when absent or blank.
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The LLM client shared by the web handlers and the CLI.
/// Cloning is cheap: the underlying reqwest client is reference counted.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl LlmClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Returns a client using `api_key` when it is non-empty, keeping the configured key otherwise.
    pub fn with_api_key(&self, api_key: Option<&str>) -> Self {
        let mut client = self.clone();
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            client.api_key = Some(key.to_string());
        }
        client
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Makes one call to the chat completions endpoint and returns the full response.
    pub async fn call(&self, request: Completion<'_>) -> Result<ChatResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt,
        });
        let body = ChatRequest {
            model: request.model,
            messages,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat: ChatResponse = response.json().await?;
        if let Some(usage) = &chat.usage {
            debug!(
                "LLM call succeeded: model={}, prompt_tokens={}, completion_tokens={}",
                request.model, usage.prompt_tokens, usage.completion_tokens
            );
        }
        Ok(chat)
    }
}

#[async_trait]
impl CompletionBackend for LlmClient {
    async fn complete(&self, request: Completion<'_>) -> Result<String, LlmError> {
        let response = self.call(request).await?;
        response
            .text()
            .map(String::from)
            .ok_or(LlmError::EmptyContent)
    }
}

/// Calls `backend` and deserializes the completion as JSON.
/// The prompt must instruct the model to return JSON only.
pub async fn complete_json<T: DeserializeOwned>(
    backend: &dyn CompletionBackend,
    request: Completion<'_>,
) -> Result<T, LlmError> {
    let text = backend.complete(request).await?;
    let text = strip_json_fences(&text);
    serde_json::from_str(text).map_err(LlmError::Parse)
}

/// Removes a Markdown code fence around the model's answer, whatever its info
/// string (`json`, `JSON`, none). An unterminated fence keeps the remainder.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(fenced) = text.strip_prefix("```") else {
        return text;
    };
    let body = fenced.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUGGESTION: &str = r#"{"weekly_objective": "Unblocked billing", "next_week_focus": ["Rollout"]}"#;

    #[test]
    fn test_fenced_suggestion_is_unwrapped() {
        let reply = format!("```json\n{SUGGESTION}\n```");
        assert_eq!(strip_json_fences(&reply), SUGGESTION);
    }

    #[test]
    fn test_fence_without_or_with_uppercase_tag() {
        let bare = format!("  ```\n{SUGGESTION}\n```  ");
        assert_eq!(strip_json_fences(&bare), SUGGESTION);
        let upper = format!("```JSON\n{SUGGESTION}```");
        assert_eq!(strip_json_fences(&upper), SUGGESTION);
    }

    #[test]
    fn test_unterminated_fence_and_plain_reply() {
        let cut = format!("```json\n{SUGGESTION}");
        assert_eq!(strip_json_fences(&cut), SUGGESTION);
        assert_eq!(strip_json_fences(&format!("\n{SUGGESTION}\n")), SUGGESTION);
    }

    #[test]
    fn test_response_text_takes_first_choice() {
        let response: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"content":"  hi  "}},{"message":{"content":"no"}}]}"#,
        )
        .unwrap();
        assert_eq!(response.text(), Some("hi"));
    }

    #[test]
    fn test_response_text_blank_is_none() {
        let response: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}],"usage":null}"#).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_with_api_key_overrides_only_when_present() {
        let client = LlmClient::new(None, DEFAULT_BASE_URL);
        assert!(!client.has_api_key());
        assert!(!client.with_api_key(Some("  ")).has_api_key());
        assert!(client.with_api_key(Some("sk-test")).has_api_key());

        let configured = LlmClient::new(Some("sk-env".to_string()), DEFAULT_BASE_URL);
        assert!(configured.with_api_key(None).has_api_key());
    }

    #[tokio::test]
    async fn test_call_without_key_fails_fast() {
        let client = LlmClient::new(Some(String::new()), "http://127.0.0.1:9");
        let err = client
            .complete(Completion {
                system: None,
                prompt: "hello",
                model: DEFAULT_MODEL,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
