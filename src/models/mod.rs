pub mod booking;
pub mod outcome;
pub mod reminder;
pub mod setting;

pub use booking::{Booking, Contact, CustomerId};
pub use outcome::{ClientOutcome, JobSummary};
pub use reminder::{ReminderIntent, TemplateVars};
pub use setting::{ClientSettings, Setting};
