pub mod whatsapp;

use async_trait::async_trait;

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_message(&self, to: &str, body: &str) -> anyhow::Result<()>;
    async fn mark_as_read(&self, message_id: &str) -> anyhow::Result<()>;
    async fn send_typing_indicator(&self, to: &str) -> anyhow::Result<()>;
}
