use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::payload::{
    deserialize_blank_as_none, deserialize_lenient_status, deserialize_lenient_timestamp,
};
use crate::state_machine::WorkflowStatus;

/// Client-side projection of a backend check-in.
///
/// Display attributes are denormalized and read-only here; the only mutation
/// path is a status command sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: i64,
    #[serde(default, deserialize_with = "deserialize_lenient_status")]
    pub status: WorkflowStatus,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub status_changed_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub check_in_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub patient: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub mrn: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub room: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub assigned_staff_name: Option<String>,
    #[serde(default, deserialize_with = "deserialize_blank_as_none")]
    pub provider_name: Option<String>,
}

impl CheckIn {
    /// Timestamp the time-in-status clock runs from
    pub fn status_reference_time(&self) -> Option<DateTime<Utc>> {
        self.status_changed_at.or(self.check_in_time)
    }
}

/// Body of `POST checkins/{id}/set-status/`
#[derive(Debug, Clone, Serialize)]
pub struct SetStatusRequest {
    pub status: String,
}
