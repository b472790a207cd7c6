use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::pipeline::ReminderJob;

pub struct AppState {
    pub config: AppConfig,
    pub job: Arc<ReminderJob>,
}
