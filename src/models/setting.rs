use std::collections::HashMap;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TIME_ZONE: Tz = chrono_tz::Asia::Kuala_Lumpur;
pub const DEFAULT_SALON_NAME: &str = "The Editor Salon";
pub const DEFAULT_WALK_IN_CONTACT_ID: i64 = -1;

const TIME_ZONE: &str = "timeZone";
const SALON_NAME: &str = "salonName";
const PHONE_NUMBER: &str = "phoneNumber";
const WALK_IN_CONTACT_ID: &str = "walkInContactId";

/// One row of a client's settings list. The raw JSON value is kept since
/// some values arrive as numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub id: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Setting {
    pub fn new(id: &str, value: &str) -> Self {
        Self {
            id: id.to_string(),
            value: serde_json::Value::String(value.to_string()),
        }
    }

    pub fn text(&self) -> Option<String> {
        let text = match &self.value {
            serde_json::Value::Null => return None,
            serde_json::Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        (!text.is_empty()).then_some(text)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub time_zone: Tz,
    pub salon_name: String,
    pub phone_number: String,
    pub walk_in_contact_id: i64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            time_zone: DEFAULT_TIME_ZONE,
            salon_name: DEFAULT_SALON_NAME.to_string(),
            phone_number: String::new(),
            walk_in_contact_id: DEFAULT_WALK_IN_CONTACT_ID,
        }
    }
}

impl ClientSettings {
    pub fn from_settings(settings: &[Setting]) -> Self {
        let by_id: HashMap<&str, String> = settings
            .iter()
            .filter_map(|s| s.text().map(|v| (s.id.as_str(), v)))
            .collect();

        Self {
            time_zone: resolve_time_zone(by_id.get(TIME_ZONE)),
            salon_name: resolve_salon_name(by_id.get(SALON_NAME)),
            phone_number: resolve_phone_number(by_id.get(PHONE_NUMBER)),
            walk_in_contact_id: resolve_walk_in_contact_id(by_id.get(WALK_IN_CONTACT_ID)),
        }
    }
}

fn resolve_time_zone(value: Option<&String>) -> Tz {
    match value {
        Some(name) => name.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!(setting = TIME_ZONE, value = %name, default = %DEFAULT_TIME_ZONE, "unknown time zone, using default");
            DEFAULT_TIME_ZONE
        }),
        None => {
            tracing::debug!(setting = TIME_ZONE, default = %DEFAULT_TIME_ZONE, "setting absent, using default");
            DEFAULT_TIME_ZONE
        }
    }
}

fn resolve_salon_name(value: Option<&String>) -> String {
    match value {
        Some(name) => name.clone(),
        None => {
            tracing::debug!(setting = SALON_NAME, default = DEFAULT_SALON_NAME, "setting absent, using default");
            DEFAULT_SALON_NAME.to_string()
        }
    }
}

fn resolve_phone_number(value: Option<&String>) -> String {
    match value {
        Some(phone) => phone.clone(),
        None => {
            tracing::debug!(setting = PHONE_NUMBER, "setting absent, using empty sender number");
            String::new()
        }
    }
}

fn resolve_walk_in_contact_id(value: Option<&String>) -> i64 {
    match value {
        Some(raw) => leading_integer(raw).unwrap_or_else(|| {
            tracing::warn!(setting = WALK_IN_CONTACT_ID, value = %raw, default = DEFAULT_WALK_IN_CONTACT_ID, "non-numeric walk-in contact id, using default");
            DEFAULT_WALK_IN_CONTACT_ID
        }),
        None => {
            tracing::debug!(setting = WALK_IN_CONTACT_ID, default = DEFAULT_WALK_IN_CONTACT_ID, "setting absent, using default");
            DEFAULT_WALK_IN_CONTACT_ID
        }
    }
}

// Integer prefix of the value, so "12.0" and "12abc" both read as 12.
fn leading_integer(raw: &str) -> Option<i64> {
    let digits_start = usize::from(raw.starts_with(['-', '+']));
    let end = raw[digits_start..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(raw.len(), |i| digits_start + i);
    if end == digits_start {
        return None;
    }
    raw[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_settings_use_defaults() {
        assert_eq!(ClientSettings::from_settings(&[]), ClientSettings::default());
    }

    #[test]
    fn test_settings_resolved_by_id_not_position() {
        let settings = vec![
            Setting::new("walkInContactId", "12"),
            Setting::new("phoneNumber", "+60312345678"),
            Setting::new("salonName", "Editor Bangsar"),
            Setting::new("timeZone", "Asia/Singapore"),
        ];

        let resolved = ClientSettings::from_settings(&settings);
        assert_eq!(resolved.time_zone, chrono_tz::Asia::Singapore);
        assert_eq!(resolved.salon_name, "Editor Bangsar");
        assert_eq!(resolved.phone_number, "+60312345678");
        assert_eq!(resolved.walk_in_contact_id, 12);
    }

    #[test]
    fn test_non_numeric_walk_in_id_defaults() {
        let resolved = ClientSettings::from_settings(&[Setting::new("walkInContactId", "none")]);
        assert_eq!(resolved.walk_in_contact_id, -1);
    }

    #[test]
    fn test_numeric_json_value_accepted() {
        let settings: Vec<Setting> =
            serde_json::from_str(r#"[{"id":"walkInContactId","value":99}]"#).unwrap();
        assert_eq!(ClientSettings::from_settings(&settings).walk_in_contact_id, 99);
    }

    #[test]
    fn test_walk_in_id_reads_integer_prefix() {
        let resolved = ClientSettings::from_settings(&[Setting::new("walkInContactId", "12.0")]);
        assert_eq!(resolved.walk_in_contact_id, 12);

        let settings: Vec<Setting> =
            serde_json::from_str(r#"[{"id":"walkInContactId","value":12.0}]"#).unwrap();
        assert_eq!(ClientSettings::from_settings(&settings).walk_in_contact_id, 12);

        assert_eq!(leading_integer("-1"), Some(-1));
        assert_eq!(leading_integer("7 (front desk)"), Some(7));
        assert_eq!(leading_integer("-"), None);
        assert_eq!(leading_integer(".5"), None);
    }

    #[test]
    fn test_unknown_time_zone_defaults() {
        let resolved = ClientSettings::from_settings(&[Setting::new("timeZone", "Mars/Olympus")]);
        assert_eq!(resolved.time_zone, DEFAULT_TIME_ZONE);
    }

    #[test]
    fn test_blank_and_null_values_are_unset() {
        let settings: Vec<Setting> = serde_json::from_str(
            r#"[{"id":"salonName","value":"  "},{"id":"timeZone","value":null}]"#,
        )
        .unwrap();
        assert_eq!(ClientSettings::from_settings(&settings), ClientSettings::default());
    }

    #[test]
    fn test_repeated_id_last_wins() {
        let settings = vec![
            Setting::new("salonName", "First"),
            Setting::new("salonName", "Second"),
        ];
        assert_eq!(ClientSettings::from_settings(&settings).salon_name, "Second");
    }
}
