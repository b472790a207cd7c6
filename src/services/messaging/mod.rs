pub mod twilio;

use async_trait::async_trait;

use crate::models::TemplateVars;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageReceipt {
    pub sid: String,
    pub status: String,
}

#[async_trait]
pub trait MessagingProvider: Send + Sync {
    async fn send_template(&self, to: &str, vars: &TemplateVars) -> anyhow::Result<MessageReceipt>;
}
