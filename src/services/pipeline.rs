use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::Instrument;
use uuid::Uuid;

use crate::errors::{AppError, JobError};
use crate::models::{ClientOutcome, ClientSettings, JobSummary, ReminderIntent};
use crate::services::booking_source::BookingSource;
use crate::services::messaging::MessagingProvider;
use crate::services::reminders::build_intents;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStage {
    Pending,
    Fetching,
    Building,
    Dispatching,
    Marking,
    Done,
}

impl ClientStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStage::Pending => "pending",
            ClientStage::Fetching => "fetching",
            ClientStage::Building => "building",
            ClientStage::Dispatching => "dispatching",
            ClientStage::Marking => "marking",
            ClientStage::Done => "done",
        }
    }
}

pub struct ReminderJob {
    source: Arc<dyn BookingSource>,
    messaging: Arc<dyn MessagingProvider>,
    clients: Vec<String>,
    running: Mutex<()>,
}

impl ReminderJob {
    pub fn new(
        source: Arc<dyn BookingSource>,
        messaging: Arc<dyn MessagingProvider>,
        clients: Vec<String>,
    ) -> Self {
        Self {
            source,
            messaging,
            clients,
            running: Mutex::new(()),
        }
    }

    pub async fn run(&self) -> Result<JobSummary, JobError> {
        let _guard = self.running.try_lock().map_err(|_| JobError::AlreadyRunning)?;
        let run_id = Uuid::new_v4();

        self.run_clients()
            .instrument(tracing::info_span!("reminder_run", %run_id))
            .await
    }

    async fn run_clients(&self) -> Result<JobSummary, JobError> {
        tracing::info!(clients = ?self.clients, "reminder run started");

        if let Err(e) = self.source.authenticate().await {
            tracing::error!(error = %e, "sign-in failed, no client can be processed");
            let summary = JobSummary {
                message: "error".to_string(),
                timestamp: Utc::now(),
                authenticated: false,
                clients: self.clients.clone(),
                reminders: BTreeMap::new(),
                error: Some(e.to_string()),
            };
            return Err(JobError::Authentication { source: e, summary });
        }

        let mut reminders = BTreeMap::new();
        for client in &self.clients {
            let outcome = match self.process_client(client).await {
                Ok(sent) => {
                    tracing::info!(client = %client, sent, "client reminders complete");
                    ClientOutcome::succeeded()
                }
                Err(e) => ClientOutcome::failed(e.to_string()),
            };
            reminders.insert(client.clone(), outcome);
        }

        let mut summary = JobSummary {
            message: "ok".to_string(),
            timestamp: Utc::now(),
            authenticated: true,
            clients: self.clients.clone(),
            reminders,
            error: None,
        };

        let failed = summary.failed_clients();
        if failed > 0 {
            summary.message = "error".to_string();
            tracing::error!(failed, total = self.clients.len(), "reminder run finished with failures");
            return Err(JobError::ClientsFailed {
                failed,
                total: self.clients.len(),
                summary,
            });
        }

        tracing::info!("reminder run finished");
        Ok(summary)
    }

    async fn process_client(&self, client: &str) -> Result<usize, AppError> {
        let mut stage = ClientStage::Pending;
        let result = self
            .run_stages(client, &mut stage)
            .instrument(tracing::info_span!("client", client))
            .await;

        if let Err(e) = &result {
            tracing::error!(client, stage = stage.as_str(), error = %e, "client reminders failed");
        }
        result
    }

    async fn run_stages(&self, client: &str, stage: &mut ClientStage) -> Result<usize, AppError> {
        *stage = ClientStage::Fetching;
        let (bookings, settings) = tokio::try_join!(
            self.source.reminder_bookings(client),
            self.source.settings(client),
        )?;
        tracing::info!(bookings = bookings.len(), "fetched reminder-eligible bookings");

        *stage = ClientStage::Building;
        let settings = ClientSettings::from_settings(&settings);
        let intents = build_intents(&bookings, &settings)?;
        if intents.is_empty() {
            tracing::info!("no reminders due");
            *stage = ClientStage::Done;
            return Ok(0);
        }

        *stage = ClientStage::Dispatching;
        let sent = intents.len();
        self.dispatch_all(intents).await?;

        *stage = ClientStage::Marking;
        let booking_ids: Vec<i64> = bookings.iter().map(|b| b.id).collect();
        self.source.mark_reminder_sent(client, &booking_ids).await?;

        *stage = ClientStage::Done;
        Ok(sent)
    }

    // Sends run on their own tasks and finish even if the run is dropped.
    async fn dispatch_all(&self, intents: Vec<ReminderIntent>) -> Result<(), AppError> {
        let total = intents.len();
        let handles = intents.into_iter().map(|intent| {
            let messaging = Arc::clone(&self.messaging);
            tokio::spawn(async move {
                messaging
                    .send_template(&intent.phone_number, &intent.template_vars)
                    .await
                    .map_err(|e| format!("{}: {e:#}", intent.phone_number))
            })
        });

        let failures: Vec<String> = futures::future::join_all(handles)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(Ok(_)) => None,
                Ok(Err(e)) => Some(e),
                Err(e) => Some(format!("send task failed: {e}")),
            })
            .collect();

        if failures.is_empty() {
            tracing::info!(sent = total, "all reminders dispatched");
            return Ok(());
        }

        Err(AppError::Dispatch(format!(
            "{} of {} reminders failed: {}",
            failures.len(),
            total,
            failures.join("; ")
        )))
    }
}
