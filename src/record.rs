use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How the customer reached us. Stamped on every draft at extraction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ContactChannel {
    Form,
    Text,
    Email,
    PhoneCall,
}

impl std::fmt::Display for ContactChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContactChannel::Form => "Form",
            ContactChannel::Text => "Text",
            ContactChannel::Email => "Email",
            ContactChannel::PhoneCall => "Phone Call",
        };
        f.write_str(s)
    }
}

/// In-progress intake record. Every schema field exists on every draft;
/// extraction fills what it can and leaves the rest empty.
///
/// `risk_flags` is always a list of matched keywords, never a joined string,
/// until it is rendered for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub initial_contact_datetime: Option<String>,
    pub contact_channel: Option<ContactChannel>,
    pub work_order_summary: Option<String>,
    pub raw_comments: Option<String>,
    #[serde(default)]
    pub risk_flags: Vec<String>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
}

impl DraftRecord {
    /// Free-form query string for the geocoder: "street, city, state zip",
    /// skipping components the record doesn't have.
    pub fn full_address(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(street) = non_empty(&self.street_address) {
            parts.push(street.to_string());
        }
        if let Some(city) = non_empty(&self.city) {
            parts.push(city.to_string());
        }
        let region = match (non_empty(&self.state), non_empty(&self.zip)) {
            (Some(state), Some(zip)) => Some(format!("{} {}", state, zip)),
            (Some(state), None) => Some(state.to_string()),
            (None, Some(zip)) => Some(zip.to_string()),
            (None, None) => None,
        };
        if let Some(region) = region {
            parts.push(region);
        }
        parts.join(", ")
    }

    /// Coordinates already attached (manual entry or a previous run)?
    /// Geocoding is skipped for such records.
    pub fn has_coordinates(&self) -> bool {
        self.gps_lat.is_some() && self.gps_lng.is_some()
    }
}

/// Finalized intake record. `case_id` and `timestamp_added` are assigned
/// exactly once, at finalization; field order follows the schema so JSON and
/// tabular output keep a stable column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizedRecord {
    pub case_id: String,
    pub customer_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub initial_contact_datetime: String,
    pub contact_channel: Option<ContactChannel>,
    pub work_order_summary: Option<String>,
    pub raw_comments: Option<String>,
    pub risk_flags: Vec<String>,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub formatted_address: String,
    pub recommended_filename: String,
    pub timestamp_added: String,
}

impl FinalizedRecord {
    /// Risk flags joined for display ("power lines, line"), empty when none.
    pub fn risk_flags_display(&self) -> String {
        self.risk_flags.join(", ")
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
