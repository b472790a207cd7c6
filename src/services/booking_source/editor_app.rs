use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;

use super::BookingSource;
use crate::errors::AppError;
use crate::models::{Booking, Setting};

const USER_AGENT: &str = concat!("salon-reminders/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const SIGN_IN_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: Option<T>,
}

#[derive(Deserialize)]
struct SignInResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<SignInData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInData {
    access_token: Option<String>,
}

/// HTTP client for the EditorApp booking backend. `authenticate` starts a
/// new session; later requests reuse that token.
pub struct EditorAppClient {
    base_url: String,
    email: String,
    password: String,
    client: reqwest::Client,
    token: Mutex<Option<String>>,
}

impl EditorAppClient {
    pub fn new(base_url: &str, email: String, password: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            email,
            password,
            client,
            token: Mutex::new(None),
        })
    }

    async fn sign_in(&self) -> Result<String, AppError> {
        tracing::info!("signing in to booking service");

        let resp = self
            .client
            .post(format!("{}/auth/signIn", self.base_url))
            .timeout(SIGN_IN_TIMEOUT)
            .json(&json!({ "email": self.email, "password": self.password }))
            .send()
            .await
            .map_err(|e| AppError::Authentication(format!("sign-in request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(AppError::Authentication(format!(
                "sign-in failed with status {status}"
            )));
        }

        let body: SignInResponse = resp
            .json()
            .await
            .map_err(|e| AppError::Authentication(format!("malformed sign-in response: {e}")))?;

        if !body.success {
            return Err(AppError::Authentication(format!(
                "sign-in failed: {}",
                body.message.as_deref().unwrap_or("Unknown error")
            )));
        }

        let token = body
            .data
            .and_then(|d| d.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Authentication("access token not found in response".into()))?;

        tracing::info!("sign-in successful, access token obtained");
        Ok(token)
    }

    async fn access_token(&self) -> Result<String, AppError> {
        let mut token = self.token.lock().await;
        if let Some(existing) = token.as_ref() {
            return Ok(existing.clone());
        }
        let fresh = self.sign_in().await?;
        *token = Some(fresh.clone());
        Ok(fresh)
    }

    async fn get_list<T: DeserializeOwned>(&self, client: &str, path: &str) -> Result<Vec<T>, AppError> {
        let token = self.access_token().await?;
        let url = format!("{}/{client}/{path}", self.base_url);

        let resp = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("GET {path} for {client} failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::Fetch(format!(
                "GET {path} for {client} returned {status}: {body}"
            )));
        }

        let envelope: DataEnvelope<Vec<T>> = resp.json().await.map_err(|e| {
            AppError::Fetch(format!("malformed {path} response for {client}: {e}"))
        })?;

        Ok(envelope.data.unwrap_or_default())
    }
}

#[async_trait]
impl BookingSource for EditorAppClient {
    async fn authenticate(&self) -> Result<(), AppError> {
        let mut token = self.token.lock().await;
        *token = None;
        *token = Some(self.sign_in().await?);
        Ok(())
    }

    async fn reminder_bookings(&self, client: &str) -> Result<Vec<Booking>, AppError> {
        self.get_list(client, "bookings/remindersAvailable").await
    }

    async fn settings(&self, client: &str) -> Result<Vec<Setting>, AppError> {
        self.get_list(client, "settings").await
    }

    async fn mark_reminder_sent(&self, client: &str, booking_ids: &[i64]) -> Result<(), AppError> {
        let token = self.access_token().await?;
        let url = format!("{}/{client}/bookings/updateReminderSent", self.base_url);

        let resp = self
            .client
            .patch(&url)
            .bearer_auth(token)
            .json(&json!({ "bookingList": booking_ids }))
            .send()
            .await
            .map_err(|e| AppError::MarkSent(format!("update for {client} failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::MarkSent(format!(
                "update for {client} returned {status}: {body}"
            )));
        }

        tracing::info!(client, count = booking_ids.len(), "bookings marked as reminded");
        Ok(())
    }
}
