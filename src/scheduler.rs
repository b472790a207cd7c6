use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::services::pipeline::ReminderJob;

/// Runs the job immediately and then every `every`. A run that would overlap
/// a manual trigger is skipped by the job's own lock.
pub fn spawn_schedule(job: Arc<ReminderJob>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            match job.run().await {
                Ok(summary) => {
                    tracing::info!(clients = summary.clients.len(), "scheduled reminder run succeeded")
                }
                Err(e) => tracing::error!(error = %e, "scheduled reminder run failed"),
            }
        }
    })
}
