use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use salon_reminders::config::AppConfig;
use salon_reminders::create_router;
use salon_reminders::scheduler::spawn_schedule;
use salon_reminders::services::booking_source::editor_app::EditorAppClient;
use salon_reminders::services::messaging::twilio::TwilioWhatsAppProvider;
use salon_reminders::services::pipeline::ReminderJob;
use salon_reminders::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    let source = EditorAppClient::new(
        &config.api_base_url,
        config.auth_email.clone(),
        config.auth_password.clone(),
    )?;
    let messaging = TwilioWhatsAppProvider::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_whatsapp_from.clone(),
        config.twilio_content_sid.clone(),
    );

    let job = Arc::new(ReminderJob::new(
        Arc::new(source),
        Arc::new(messaging),
        config.clients.clone(),
    ));

    if std::env::args().any(|a| a == "--once") {
        let result = job.run().await;
        let summary = match &result {
            Ok(summary) => Some(summary),
            Err(e) => e.summary(),
        };
        if let Some(summary) = summary {
            println!("{}", serde_json::to_string_pretty(summary)?);
        }
        result?;
        return Ok(());
    }

    if config.reminder_interval_secs > 0 {
        tracing::info!(every_secs = config.reminder_interval_secs, "starting reminder schedule");
        spawn_schedule(Arc::clone(&job), Duration::from_secs(config.reminder_interval_secs));
    } else {
        tracing::info!("reminder schedule disabled, manual trigger only");
    }

    let state = Arc::new(AppState {
        config: config.clone(),
        job,
    });
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
