/// LLM Client — the single point of entry for local model calls.
///
/// ARCHITECTURAL RULE: No other module may talk to the model server directly.
/// Everything goes through the `TextModel` trait defined here.
///
/// Backend: a llama.cpp server (`llama-server -m <weights.gguf>`) exposing `/completion`.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const COMPLETION_PATH: &str = "/completion";
const MAX_RETRIES: u32 = 3;
/// Transport-level cap. The orchestrator applies its own, usually shorter, timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Model server unavailable after {retries} retries")]
    Unavailable { retries: u32 },

    #[error("Model returned empty content")]
    EmptyContent,
}

/// Sampling parameters for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub repeat_penalty: f32,
    pub stop: Vec<String>,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            max_tokens: 2048,
            temperature: 0.7,
            top_p: 0.95,
            repeat_penalty: 1.1,
            stop: vec![
                prompts::END_OF_OUTPUT.to_string(),
                prompts::USER_TURN.to_string(),
            ],
        }
    }
}

/// The model-invocation capability the orchestrator depends on.
///
/// Carried as `Arc<dyn TextModel>` so tests can swap in a scripted model.
#[async_trait]
pub trait TextModel: Send + Sync {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    repeat_penalty: f32,
    stop: &'a [String],
    stream: bool,
}

impl<'a> CompletionRequest<'a> {
    fn new(prompt: &'a str, params: &'a GenerationParams) -> Self {
        Self {
            prompt,
            n_predict: params.max_tokens,
            temperature: params.temperature,
            top_p: params.top_p,
            repeat_penalty: params.repeat_penalty,
            stop: &params.stop,
            stream: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub content: String,
    #[serde(default)]
    pub tokens_predicted: u32,
    #[serde(default)]
    pub stopped_word: bool,
}

#[derive(Debug, Deserialize)]
struct ServerError {
    error: ServerErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    message: String,
}

/// Client for a llama.cpp server.
///
/// Cheap to clone and safe to share between concurrent generations:
/// `reqwest::Client` pools connections internally.
#[derive(Clone)]
pub struct LlamaClient {
    client: Client,
    base_url: String,
}

impl LlamaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Makes a raw completion call, returning the full response object.
    /// Retries on 429 and 5xx (llama-server answers 503 while loading weights)
    /// with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        params: &GenerationParams,
    ) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}{}", self.base_url, COMPLETION_PATH);
        let request_body = CompletionRequest::new(prompt, params);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self.client.post(&url).json(&request_body).send().await {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Model server returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ServerError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            let completion: CompletionResponse = serde_json::from_str(&body)?;

            debug!(
                "Model call succeeded: tokens_predicted={}, stopped_word={}",
                completion.tokens_predicted, completion.stopped_word
            );

            return Ok(completion);
        }

        Err(last_error.unwrap_or(LlmError::Unavailable {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextModel for LlamaClient {
    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        let completion = self.call(prompt, params).await?;
        if completion.content.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(completion.content)
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
///
/// Expects the text before `prompts::END_OF_OUTPUT`; a sentinel after the
/// closing fence keeps the fence in place.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    let Some(inner) = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
    else {
        return text;
    };
    let inner = inner.trim_start();
    inner.strip_suffix("```").map(str::trim).unwrap_or(inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_unterminated() {
        let input = "```json\n{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_on_answer_before_sentinel() {
        let answer = "```json\n{\"nombre\": \"Ana\", \"proyectos\": \"<div class=\\\"projects-grid\\\"></div>\"}\n```\n<<FIN>>\nUsuario:";
        let (body, _) = answer.split_once(prompts::END_OF_OUTPUT).unwrap();
        let json = strip_json_fences(body);
        assert!(json.starts_with('{') && json.ends_with('}'));
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        assert_eq!(value["nombre"], "Ana");

        // Without the split the trailing sentinel keeps the closing fence.
        assert!(strip_json_fences(answer).ends_with(prompts::USER_TURN));
    }

    #[test]
    fn test_completion_request_uses_llama_field_names() {
        let params = GenerationParams::default();
        let body = serde_json::to_value(CompletionRequest::new("hola", &params)).unwrap();
        assert_eq!(body["prompt"], "hola");
        assert_eq!(body["n_predict"], 2048);
        assert_eq!(body["repeat_penalty"].as_f64().map(|v| (v * 10.0).round()), Some(11.0));
        assert_eq!(body["stream"], false);
        assert_eq!(body["stop"][0], prompts::END_OF_OUTPUT);
    }

    #[test]
    fn test_completion_response_tolerates_missing_counters() {
        let response: CompletionResponse =
            serde_json::from_str(r#"{"content": "{}", "model": "deepseek"}"#).unwrap();
        assert_eq!(response.content, "{}");
        assert_eq!(response.tokens_predicted, 0);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = LlamaClient::new("http://127.0.0.1:8080/").unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
    }
}
