use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured output of the natural language parsing collaborator, mirrored
/// field for field. Only drafts with `success == true` may enter the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftReminder {
    #[serde(default)]
    pub title: String,
    pub notes: Option<String>,
    /// RFC 3339 datetime string for the trigger instant
    #[serde(default)]
    pub datetime_iso: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    pub success: bool,
    pub error: Option<String>,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl DraftReminder {
    /// The draft's trigger instant as a UTC datetime
    pub fn trigger_instant(&self) -> Result<DateTime<Utc>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(&self.datetime_iso).map(|dt| dt.with_timezone(&Utc))
    }
}
