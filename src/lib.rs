//! Appointment reminder job for EditorApp salon clients.
//!
//! For each configured client the job fetches reminder-eligible bookings,
//! groups them per customer, sends one WhatsApp template message per customer
//! and marks the bookings as reminded in the booking service.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod scheduler;
pub mod services;
pub mod state;

pub use routes::create_router;
