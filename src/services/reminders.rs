use std::collections::HashMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::{Booking, ClientSettings, CustomerId, ReminderIntent, TemplateVars};

const NO_STYLIST_PREFERENCE: &str = "No Stylist Preference";
const JOIN_SEPARATOR: &str = " and ";
const DATE_FORMAT: &str = "%d/%m/%Y %-I:%M %p";

pub fn build_intents(
    bookings: &[Booking],
    settings: &ClientSettings,
) -> Result<Vec<ReminderIntent>, AppError> {
    group_by_customer(bookings)
        .into_iter()
        .map(|group| build_intent(&group, settings))
        .collect()
}

pub fn group_by_customer(bookings: &[Booking]) -> Vec<Vec<&Booking>> {
    let mut index: HashMap<&CustomerId, usize> = HashMap::new();
    let mut groups: Vec<Vec<&Booking>> = Vec::new();

    for booking in bookings {
        match index.get(&booking.customer_id) {
            Some(&i) => groups[i].push(booking),
            None => {
                index.insert(&booking.customer_id, groups.len());
                groups.push(vec![booking]);
            }
        }
    }

    groups
}

fn build_intent(group: &[&Booking], settings: &ClientSettings) -> Result<ReminderIntent, AppError> {
    let first = group
        .first()
        .ok_or_else(|| AppError::DataIntegrity("empty booking group".into()))?;

    let customer = if group.len() > 1 {
        format!("{} ({} pax)", first.name, group.len())
    } else {
        first.name.clone()
    };

    let mut contacts = Vec::with_capacity(group.len());
    let mut dates = Vec::with_capacity(group.len());
    for booking in group {
        contacts.push(person_in_charge(booking, settings.walk_in_contact_id)?);
        dates.push(format_date(&booking.date, settings.time_zone));
    }

    Ok(ReminderIntent {
        phone_number: normalize_phone(&first.phone_number),
        template_vars: TemplateVars {
            customer,
            salon_name: settings.salon_name.clone(),
            dates: join_unique(dates),
            stylists: join_unique(contacts),
            salon_phone: settings.phone_number.clone(),
        },
    })
}

pub fn person_in_charge(booking: &Booking, walk_in_contact_id: i64) -> Result<String, AppError> {
    let unassigned_walk_in = booking.is_walk_in && booking.contact_id.is_none();
    if unassigned_walk_in || booking.contact_id == Some(walk_in_contact_id) {
        return Ok(booking
            .stylist_preference
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_STYLIST_PREFERENCE)
            .to_string());
    }

    booking
        .contact
        .as_ref()
        .and_then(|c| c.name.clone())
        .ok_or_else(|| {
            AppError::DataIntegrity(format!(
                "booking {} of customer {} has no contact name for contact {}",
                booking.id,
                booking.customer_id,
                booking
                    .contact_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ))
        })
}

pub fn format_date(date: &DateTime<Utc>, tz: Tz) -> String {
    date.with_timezone(&tz).format(DATE_FORMAT).to_string()
}

// Leading 0 is a Malaysian local number.
pub fn normalize_phone(raw: &str) -> String {
    let phone = raw.trim();
    if phone.starts_with('+') {
        phone.to_string()
    } else if phone.starts_with('0') {
        format!("+6{phone}")
    } else {
        format!("+{phone}")
    }
}

fn join_unique(values: Vec<String>) -> String {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique.join(JOIN_SEPARATOR)
}
