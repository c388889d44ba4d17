use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::MessagingProvider;

/// WhatsApp Business Cloud API client (graph.facebook.com).
pub struct WhatsAppCloudProvider {
    token: String,
    base_url: String,
    client: reqwest::Client,
}

impl WhatsAppCloudProvider {
    pub fn new(token: String, phone_number_id: String, api_version: String) -> Self {
        Self {
            token,
            base_url: format!("https://graph.facebook.com/{api_version}/{phone_number_id}"),
            client: reqwest::Client::new(),
        }
    }

    async fn post_messages(&self, body: serde_json::Value) -> anyhow::Result<()> {
        self.client
            .post(format!("{}/messages", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .context("failed to call WhatsApp API")?
            .error_for_status()
            .context("WhatsApp API returned error")?;

        Ok(())
    }
}

#[async_trait]
impl MessagingProvider for WhatsAppCloudProvider {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()> {
        self.post_messages(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": {
                "preview_url": false,
                "body": body,
            },
        }))
        .await
    }

    async fn mark_as_read(&self, message_id: &str) -> anyhow::Result<()> {
        self.post_messages(json!({
            "messaging_product": "whatsapp",
            "status": "read",
            "message_id": message_id,
        }))
        .await
    }

    async fn send_typing_indicator(&self, to: &str) -> anyhow::Result<()> {
        self.post_messages(json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "typing": "on",
        }))
        .await
    }
}
