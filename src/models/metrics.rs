use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::payload::{deserialize_lenient_status, deserialize_lenient_timestamp};
use crate::state_machine::WorkflowStatus;

/// Payload of `GET metrics/dashboard/?date=YYYY-MM-DD`.
///
/// Aggregation happens server-side. Every field is defaulted so a partial
/// payload renders with "no data" cards instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardMetrics {
    #[serde(default, deserialize_with = "deserialize_lenient_timestamp")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub live_counts_by_status: Vec<StatusCount>,
    #[serde(default)]
    pub live_counts_by_provider_name: Vec<ProviderCount>,
    #[serde(default)]
    pub today_outcomes_by_status: Vec<OutcomeCount>,
    #[serde(default)]
    pub today_outcomes_by_provider: Vec<ProviderOutcomeCount>,
    #[serde(default)]
    pub today_total_appointments: Option<u64>,
    #[serde(default)]
    pub longest_waiters: Vec<WaiterRecord>,
    #[serde(default)]
    pub avg_total_visit_minutes_today: Option<i64>,
    #[serde(default)]
    pub wait_time_alert_thresholds_minutes: HashMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    #[serde(default, deserialize_with = "deserialize_lenient_status")]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCount {
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub count: u64,
}

/// Appointment outcome count; appointment statuses include `scheduled`,
/// `cancelled` and `no_show`, which are not check-in states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeCount {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderOutcomeCount {
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub count: u64,
}

/// One entry of the longest-waiters list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaiterRecord {
    pub checkin_id: i64,
    #[serde(default)]
    pub patient_id: Option<i64>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub mrn: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_status")]
    pub status: WorkflowStatus,
    #[serde(default)]
    pub minutes_in_status: i64,
    /// Server-side opinion; the client recomputes the flag on every render
    #[serde(default)]
    pub alert: bool,
    #[serde(default)]
    pub threshold_minutes: Option<i64>,
}
