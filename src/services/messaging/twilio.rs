use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::{MessageReceipt, MessagingProvider};
use crate::models::TemplateVars;

const WHATSAPP_PREFIX: &str = "whatsapp:";

#[derive(Deserialize)]
struct MessageResponse {
    sid: String,
    #[serde(default)]
    status: String,
}

pub struct TwilioWhatsAppProvider {
    account_sid: String,
    auth_token: String,
    from_number: String,
    content_sid: String,
    client: reqwest::Client,
}

impl TwilioWhatsAppProvider {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        content_sid: String,
    ) -> Self {
        Self {
            account_sid,
            auth_token,
            from_number: whatsapp_address(&from_number),
            content_sid,
            client: reqwest::Client::new(),
        }
    }
}

pub fn whatsapp_address(number: &str) -> String {
    if number.starts_with(WHATSAPP_PREFIX) {
        number.to_string()
    } else {
        format!("{WHATSAPP_PREFIX}{number}")
    }
}

#[async_trait]
impl MessagingProvider for TwilioWhatsAppProvider {
    async fn send_template(&self, to: &str, vars: &TemplateVars) -> anyhow::Result<MessageReceipt> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );
        let to = whatsapp_address(to);
        let variables =
            serde_json::to_string(vars).context("failed to encode template variables")?;

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to.as_str()),
                ("From", self.from_number.as_str()),
                ("ContentSid", self.content_sid.as_str()),
                ("ContentVariables", variables.as_str()),
            ])
            .send()
            .await
            .context("failed to send Twilio WhatsApp message")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Twilio API error ({status}): {body}");
        }

        let message: MessageResponse = resp
            .json()
            .await
            .context("failed to parse Twilio response")?;

        tracing::info!(to = %to, sid = %message.sid, status = %message.status, "reminder sent");

        Ok(MessageReceipt {
            sid: message.sid,
            status: message.status,
        })
    }
}
