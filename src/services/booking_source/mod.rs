pub mod editor_app;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{Booking, Setting};

#[async_trait]
pub trait BookingSource: Send + Sync {
    /// Signs in again, dropping any token held from an earlier run.
    async fn authenticate(&self) -> Result<(), AppError>;

    async fn reminder_bookings(&self, client: &str) -> Result<Vec<Booking>, AppError>;

    async fn settings(&self, client: &str) -> Result<Vec<Setting>, AppError>;

    async fn mark_reminder_sent(&self, client: &str, booking_ids: &[i64]) -> Result<(), AppError>;
}
