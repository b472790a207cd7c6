use serde::{Deserialize, Serialize};

/// Variables of the WhatsApp reminder template. Serialized with the numbered
/// keys the content template expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateVars {
    #[serde(rename = "1")]
    pub customer: String,
    #[serde(rename = "2")]
    pub salon_name: String,
    #[serde(rename = "3")]
    pub dates: String,
    #[serde(rename = "4")]
    pub stylists: String,
    #[serde(rename = "5")]
    pub salon_phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderIntent {
    pub phone_number: String,
    pub template_vars: TemplateVars,
}
