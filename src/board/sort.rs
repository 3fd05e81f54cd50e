use chrono::{DateTime, Utc};

use crate::models::CheckIn;

/// Display order for the live board.
///
/// Workflow stage first (unknown statuses last), then earliest arrival. A
/// missing `check_in_time` sorts as the epoch. The sort is stable, so ties
/// keep backend order.
pub fn sort_for_display(checkins: &mut [CheckIn]) {
    checkins.sort_by(|a, b| {
        a.status
            .cmp_stage(&b.status)
            .then_with(|| arrival_key(a).cmp(&arrival_key(b)))
    });
}

fn arrival_key(checkin: &CheckIn) -> DateTime<Utc> {
    checkin.check_in_time.unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::WorkflowStatus;
    use chrono::TimeZone;

    fn checkin(id: i64, status: &str, minute: Option<u32>) -> CheckIn {
        CheckIn {
            id,
            status: WorkflowStatus::from(status),
            status_changed_at: None,
            check_in_time: minute.map(|m| Utc.with_ymd_and_hms(2025, 3, 4, 8, m, 0).unwrap()),
            patient: None,
            patient_name: None,
            mrn: None,
            room: None,
            assigned_staff_name: None,
            provider_name: None,
        }
    }

    fn ids(checkins: &[CheckIn]) -> Vec<i64> {
        checkins.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_stage_then_arrival() {
        let mut list = vec![
            checkin(1, "ready", Some(2)),
            checkin(2, "checked_in", Some(1)),
            checkin(3, "ready", Some(0)),
        ];
        sort_for_display(&mut list);
        assert_eq!(ids(&list), vec![2, 3, 1]);
    }

    #[test]
    fn test_unknown_status_sorts_last() {
        let mut list = vec![
            checkin(1, "triaged", Some(0)),
            checkin(2, "completed", Some(5)),
            checkin(3, "in_progress", Some(9)),
        ];
        sort_for_display(&mut list);
        assert_eq!(ids(&list), vec![3, 2, 1]);
    }

    #[test]
    fn test_missing_arrival_sorts_first_within_stage_and_ties_are_stable() {
        let mut list = vec![
            checkin(1, "roomed", Some(3)),
            checkin(2, "roomed", None),
            checkin(3, "roomed", Some(3)),
        ];
        sort_for_display(&mut list);
        assert_eq!(ids(&list), vec![2, 1, 3]);
    }
}
