pub mod booking_source;
pub mod messaging;
pub mod pipeline;
pub mod reminders;
