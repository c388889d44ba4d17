use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{CompletionProvider, Message};

// Replies stay short and conversational; the cap also bounds cost.
const MAX_TOKENS: u32 = 300;
const TEMPERATURE: f64 = 0.7;

/// Client for any OpenAI-compatible chat-completions endpoint (Together
/// AI by default). The request timeout doubles as the engine's bound on
/// the only blocking call in the message path.
pub struct OpenAiCompatProvider {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Self {
        Self {
            api_key,
            base_url,
            model,
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatProvider {
    async fn chat(&self, system_prompt: &str, messages: &[Message]) -> anyhow::Result<String> {
        let mut chat_messages = vec![json!({
            "role": "system",
            "content": system_prompt,
        })];

        for msg in messages {
            chat_messages.push(json!({
                "role": msg.role,
                "content": msg.content,
            }));
        }

        let body = json!({
            "model": self.model,
            "messages": chat_messages,
            "temperature": TEMPERATURE,
            "max_tokens": MAX_TOKENS,
        });

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("failed to call completion API")?;

        let status = resp.status();
        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse completion response")?;

        if !status.is_success() {
            anyhow::bail!("completion API error ({}): {}", status, data);
        }

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in completion response"))
    }
}
