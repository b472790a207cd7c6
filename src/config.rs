use std::env;

use crate::errors::AppError;

pub const DEFAULT_API_BASE_URL: &str = "https://editorapp-be.fly.dev/api";
pub const DEFAULT_CONTENT_SID: &str = "HX95ef541de146404ce29cb5228ddee000";
const DEFAULT_CLIENTS: &str = "THEEDTR,THEEDSA";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub admin_token: String,
    pub api_base_url: String,
    pub auth_email: String,
    pub auth_password: String,
    pub twilio_account_sid: String,
    pub twilio_auth_token: String,
    pub twilio_whatsapp_from: String,
    pub twilio_content_sid: String,
    pub clients: Vec<String>,
    /// Seconds between scheduled runs. Zero disables the schedule.
    pub reminder_interval_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            auth_email: env::var("AUTH_EMAIL").unwrap_or_default(),
            auth_password: env::var("AUTH_PASSWORD").unwrap_or_default(),
            twilio_account_sid: env::var("TWILIO_ACCOUNT_SID").unwrap_or_default(),
            twilio_auth_token: env::var("TWILIO_AUTH_TOKEN").unwrap_or_default(),
            twilio_whatsapp_from: env::var("TWILIO_WHATSAPP_FROM").unwrap_or_default(),
            twilio_content_sid: env::var("TWILIO_CONTENT_SID")
                .unwrap_or_else(|_| DEFAULT_CONTENT_SID.to_string()),
            clients: parse_clients(
                &env::var("REMINDER_CLIENTS").unwrap_or_else(|_| DEFAULT_CLIENTS.to_string()),
            ),
            reminder_interval_secs: env::var("REMINDER_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.clients.is_empty() {
            return Err(AppError::Config("REMINDER_CLIENTS must name at least one client".into()));
        }
        if self.auth_email.is_empty() || self.auth_password.is_empty() {
            return Err(AppError::Config("AUTH_EMAIL and AUTH_PASSWORD must be set".into()));
        }
        Ok(())
    }
}

pub fn parse_clients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}
