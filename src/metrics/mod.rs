//! # Metrics Dashboard
//!
//! Aggregation happens server-side. This module owns the client-only
//! interpretation of the payload: threshold alerts, waiter ordering, and
//! explicit "no data" cards.

pub mod cards;
pub mod dashboard;

use std::collections::HashMap;

use crate::models::WaiterRecord;

pub use cards::{
    Card, CardContent, MetricsKpis, MetricsView, OutcomeRow, ProviderCountRow,
    ProviderOutcomeRow, StatusCountRow, WaiterRow,
};
pub use dashboard::{should_auto_refresh, MetricsDashboard, MetricsOutcome, MetricsSnapshot};

/// Threshold that applies to a waiter: its own `threshold_minutes`, else the
/// per-status entry of the payload's threshold map.
pub fn alert_threshold(record: &WaiterRecord, thresholds: &HashMap<String, i64>) -> Option<i64> {
    record
        .threshold_minutes
        .or_else(|| thresholds.get(record.status.as_str()).copied())
}

/// Whether a waiter has reached its alert threshold.
///
/// Recomputed on every call. A waiter with no applicable threshold never
/// alerts, and the server-supplied `alert` flag is ignored.
pub fn is_alert(record: &WaiterRecord, thresholds: &HashMap<String, i64>) -> bool {
    alert_threshold(record, thresholds).is_some_and(|threshold| record.minutes_in_status >= threshold)
}

/// Longest waiters first; ties broken by check-in id, truncated to `limit`.
pub fn order_longest_waiters(records: &[WaiterRecord], limit: usize) -> Vec<WaiterRecord> {
    let mut ordered = records.to_vec();
    ordered.sort_by(|a, b| {
        b.minutes_in_status
            .cmp(&a.minutes_in_status)
            .then_with(|| a.checkin_id.cmp(&b.checkin_id))
    });
    ordered.truncate(limit);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::WorkflowStatus;

    fn waiter(checkin_id: i64, minutes: i64, threshold: Option<i64>) -> WaiterRecord {
        WaiterRecord {
            checkin_id,
            patient_id: None,
            patient_name: None,
            mrn: None,
            status: WorkflowStatus::from("checked_in"),
            minutes_in_status: minutes,
            alert: false,
            threshold_minutes: threshold,
        }
    }

    #[test]
    fn test_alert_threshold_is_inclusive() {
        let none = HashMap::new();
        assert!(is_alert(&waiter(1, 45, Some(45)), &none));
        assert!(!is_alert(&waiter(1, 44, Some(45)), &none));
        assert!(is_alert(&waiter(1, 46, Some(45)), &none));
    }

    #[test]
    fn test_missing_threshold_never_alerts() {
        assert!(!is_alert(&waiter(1, 600, None), &HashMap::new()));

        let other_status = HashMap::from([("roomed".to_string(), 10)]);
        assert!(!is_alert(&waiter(1, 600, None), &other_status));
    }

    #[test]
    fn test_status_threshold_map_is_fallback() {
        let thresholds = HashMap::from([("checked_in".to_string(), 30)]);

        assert_eq!(alert_threshold(&waiter(1, 30, None), &thresholds), Some(30));
        assert!(is_alert(&waiter(1, 30, None), &thresholds));
        assert!(!is_alert(&waiter(1, 29, None), &thresholds));

        // A record's own threshold wins over the map
        assert_eq!(alert_threshold(&waiter(1, 30, Some(45)), &thresholds), Some(45));
        assert!(!is_alert(&waiter(1, 30, Some(45)), &thresholds));
    }

    #[test]
    fn test_server_alert_flag_is_ignored() {
        let mut record = waiter(1, 5, Some(15));
        record.alert = true;
        assert!(!is_alert(&record, &HashMap::new()));
    }

    #[test]
    fn test_longest_waiters_ordering() {
        let records = vec![
            waiter(4, 10, None),
            waiter(2, 30, None),
            waiter(1, 10, None),
            waiter(3, 30, None),
        ];
        let ids: Vec<i64> = order_longest_waiters(&records, 10)
            .iter()
            .map(|w| w.checkin_id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1, 4]);

        assert_eq!(order_longest_waiters(&records, 2).len(), 2);
    }
}
