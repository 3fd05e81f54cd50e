//! View-models for the metrics dashboard cards.

use chrono::{DateTime, Utc};

use super::{alert_threshold, is_alert, order_longest_waiters};
use crate::constants::{messages, EMPTY_DISPLAY};
use crate::labels::WorkflowLabels;
use crate::models::DashboardMetrics;
use crate::state_machine::WorkflowStatus;

/// Either rendered rows or an explicit empty state. An empty card is never
/// rendered as an empty table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardContent<T> {
    Rows(Vec<T>),
    NoData(&'static str),
}

impl<T> CardContent<T> {
    fn from_rows(rows: Vec<T>, empty_message: &'static str) -> Self {
        if rows.is_empty() {
            Self::NoData(empty_message)
        } else {
            Self::Rows(rows)
        }
    }

    pub fn rows(&self) -> &[T] {
        match self {
            Self::Rows(rows) => rows,
            Self::NoData(_) => &[],
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<T> {
    pub title: &'static str,
    pub content: CardContent<T>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusCountRow {
    pub status: WorkflowStatus,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCountRow {
    pub provider: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeRow {
    pub status: Option<String>,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOutcomeRow {
    pub provider: String,
    pub status_label: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaiterRow {
    pub checkin_id: i64,
    pub patient_id: Option<i64>,
    pub patient_name: String,
    pub mrn: String,
    pub status: WorkflowStatus,
    pub status_label: String,
    pub minutes_in_status: i64,
    pub alert: bool,
    /// "Alert ≥ 45m" when alerting, an em-dash otherwise
    pub alert_badge: String,
}

/// Headline numbers above the cards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsKpis {
    pub avg_total_visit_minutes: String,
    pub total_live_patients: u64,
    pub today_total_appointments: u64,
    pub generated_at: Option<DateTime<Utc>>,
    pub generated_at_display: String,
}

/// Fully rendered dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsView {
    pub kpis: MetricsKpis,
    pub live_by_status: Card<StatusCountRow>,
    pub live_by_provider: Card<ProviderCountRow>,
    pub outcomes_by_status: Card<OutcomeRow>,
    pub outcomes_by_provider: Card<ProviderOutcomeRow>,
    pub longest_waiters: Card<WaiterRow>,
}

impl MetricsView {
    pub fn build(metrics: &DashboardMetrics, labels: &WorkflowLabels, waiter_limit: usize) -> Self {
        let live_by_status = metrics
            .live_counts_by_status
            .iter()
            .map(|row| StatusCountRow {
                status: row.status.clone(),
                label: labels.label(row.status.as_str()),
                count: row.count,
            })
            .collect();

        let live_by_provider = metrics
            .live_counts_by_provider_name
            .iter()
            .map(|row| ProviderCountRow {
                provider: provider_display(&row.provider_name),
                count: row.count,
            })
            .collect();

        let outcomes_by_status = metrics
            .today_outcomes_by_status
            .iter()
            .map(|row| OutcomeRow {
                status: row.status.clone(),
                label: match row.status.as_deref() {
                    Some(status) if !status.trim().is_empty() => labels.label(status),
                    _ => "Unknown".to_string(),
                },
                count: row.count,
            })
            .collect();

        let outcomes_by_provider = metrics
            .today_outcomes_by_provider
            .iter()
            .map(|row| ProviderOutcomeRow {
                provider: provider_display(&row.provider_name),
                status_label: row
                    .status
                    .as_deref()
                    .map(|status| labels.label(status))
                    .unwrap_or_else(|| EMPTY_DISPLAY.to_string()),
                count: row.count,
            })
            .collect();

        let longest_waiters = order_longest_waiters(&metrics.longest_waiters, waiter_limit)
            .into_iter()
            .map(|record| {
                let thresholds = &metrics.wait_time_alert_thresholds_minutes;
                let alert = is_alert(&record, thresholds);
                let alert_badge = match (alert, alert_threshold(&record, thresholds)) {
                    (true, Some(threshold)) => format!("Alert ≥ {threshold}m"),
                    _ => EMPTY_DISPLAY.to_string(),
                };
                WaiterRow {
                    checkin_id: record.checkin_id,
                    patient_id: record.patient_id,
                    patient_name: record
                        .patient_name
                        .clone()
                        .unwrap_or_else(|| EMPTY_DISPLAY.to_string()),
                    mrn: record.mrn.clone().unwrap_or_else(|| EMPTY_DISPLAY.to_string()),
                    status_label: labels.label(record.status.as_str()),
                    status: record.status,
                    minutes_in_status: record.minutes_in_status,
                    alert,
                    alert_badge,
                }
            })
            .collect();

        Self {
            kpis: MetricsKpis {
                avg_total_visit_minutes: metrics
                    .avg_total_visit_minutes_today
                    .map(|minutes| minutes.to_string())
                    .unwrap_or_else(|| EMPTY_DISPLAY.to_string()),
                total_live_patients: metrics.live_counts_by_status.iter().map(|r| r.count).sum(),
                today_total_appointments: metrics.today_total_appointments.unwrap_or(0),
                generated_at: metrics.generated_at,
                generated_at_display: metrics
                    .generated_at
                    .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_else(|| EMPTY_DISPLAY.to_string()),
            },
            live_by_status: Card {
                title: "Live Counts by Status",
                content: CardContent::from_rows(live_by_status, messages::NO_LIVE_COUNTS),
            },
            live_by_provider: Card {
                title: "Live Counts by Provider",
                content: CardContent::from_rows(live_by_provider, messages::NO_PROVIDER_COUNTS),
            },
            outcomes_by_status: Card {
                title: "Today's Appointment Outcomes",
                content: CardContent::from_rows(outcomes_by_status, messages::NO_OUTCOMES),
            },
            outcomes_by_provider: Card {
                title: "Today Outcomes by Provider",
                content: CardContent::from_rows(
                    outcomes_by_provider,
                    messages::NO_PROVIDER_OUTCOMES,
                ),
            },
            longest_waiters: Card {
                title: "Longest Waiters",
                content: CardContent::from_rows(longest_waiters, messages::NO_WAITERS),
            },
        }
    }
}

fn provider_display(name: &Option<String>) -> String {
    match name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => messages::UNASSIGNED_PROVIDER.to_string(),
    }
}
