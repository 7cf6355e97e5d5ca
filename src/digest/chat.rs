use crate::digest::auth::AccessToken;
use crate::digest::config::ChatConfig;
use crate::digest::http::body_text;
use crate::error::RequestError;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
}

pub struct ChatClient {
    http: Client,
    url: String,
    model: String,
    temperature: f64,
    timeout: Duration,
}

/// First choice's message content of a chat-completions payload.
fn extract_reply_text(json: &Value) -> Option<String> {
    let choices = json.get("choices").and_then(Value::as_array)?;
    let first = choices.first()?;
    let content = first.get("message")?.get("content")?;
    match content {
        Value::String(s) => Some(s.to_string()),
        Value::Array(parts) => {
            let chunks = parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>();
            if chunks.is_empty() {
                None
            } else {
                Some(chunks.join("\n"))
            }
        }
        _ => None,
    }
}

impl ChatClient {
    pub fn new(http: Client, config: &ChatConfig) -> Self {
        Self {
            http,
            url: config.url.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn complete(
        &self,
        system_prompt: &str,
        user_content: &str,
        token: &AccessToken,
    ) -> Result<String, RequestError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(&self.url)
            .timeout(self.timeout)
            .bearer_auth(token.as_str())
            .header("Accept", "application/json")
            .json(&request)
            .send()
            .map_err(RequestError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RequestError::Status {
                status: status.as_u16(),
                body: body_text(response),
            });
        }

        let raw = response.text().map_err(RequestError::Transport)?;
        serde_json::from_str::<Value>(&raw)
            .ok()
            .as_ref()
            .and_then(extract_reply_text)
            .ok_or_else(|| RequestError::UnexpectedShape { payload: raw })
    }
}
