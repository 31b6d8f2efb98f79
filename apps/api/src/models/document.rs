use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Input for one document-generation job.
///
/// Immutable once accepted; every provider receives it by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub project_name: String,
    #[serde(default = "default_project_type")]
    pub project_type: String,
    #[serde(default)]
    pub location: Option<String>,
    /// ISO `YYYY-MM-DD`. Defaults to today's local date at deserialization time.
    #[serde(default = "today")]
    pub meeting_date: NaiveDate,
}

fn default_project_type() -> String {
    "Commercial".to_string()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl DocumentRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.project_name.trim().is_empty() {
            return Err(AppError::Validation(
                "project_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_commercial(&self) -> bool {
        self.project_type.eq_ignore_ascii_case("commercial")
    }

    /// Human-readable meeting date, e.g. "April 27, 2025".
    pub fn formatted_meeting_date(&self) -> String {
        self.meeting_date.format("%B %d, %Y").to_string()
    }
}
