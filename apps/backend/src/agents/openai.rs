//! OpenAI chat completions over `reqwest`.

use async_trait::async_trait;
use serde_json::{json, Value};

use super::error::AgentError;
use super::llm::{LlmClient, LlmRequest, LlmResponse};

pub struct OpenAiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }
}

fn parse_completion(json: &Value, fallback_model: &str) -> Result<LlmResponse, AgentError> {
    let content = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AgentError::InvalidResponse("completion has no message content".into()))?;

    Ok(LlmResponse {
        content: content.to_string(),
        model: json["model"].as_str().unwrap_or(fallback_model).to_string(),
        prompt_tokens: json["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
        completion_tokens: json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
    })
}

const MAX_ERROR_BODY: usize = 200;

/// Classify by status before touching the body, so an HTML or empty error
/// page still maps to `Api { status }` rather than a transport failure.
fn decode_body(status: u16, text: &str) -> Result<Value, AgentError> {
    if status >= 400 {
        let message = serde_json::from_str::<Value>(text)
            .ok()
            .and_then(|body| body["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| {
                let trimmed = text.trim();
                match trimmed.char_indices().nth(MAX_ERROR_BODY) {
                    Some((cut, _)) => trimmed[..cut].to_string(),
                    None if trimmed.is_empty() => "unknown API error".to_string(),
                    None => trimmed.to_string(),
                }
            });
        return Err(AgentError::Api { status, message });
    }
    serde_json::from_str(text).map_err(|e| AgentError::InvalidResponse(e.to_string()))
}

async fn check_status(resp: reqwest::Response) -> Result<Value, AgentError> {
    let status = resp.status().as_u16();
    let text = resp.text().await?;
    decode_body(status, &text)
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, req: LlmRequest) -> Result<LlmResponse, AgentError> {
        let model = if req.model.is_empty() {
            self.model.as_str()
        } else {
            req.model.as_str()
        };
        let body = json!({
            "model": model,
            "messages": req.messages,
            "max_tokens": req.max_tokens,
            "temperature": req.temperature,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        let json = check_status(resp).await?;
        parse_completion(&json, model)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
