//! Test data builders for check-ins and dashboard payloads.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use clinic_flow::models::{CheckIn, WaiterRecord};
use clinic_flow::state_machine::WorkflowStatus;

/// Fixed clock used across tests: 2025-03-04 15:00:00 UTC
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 4, 15, 0, 0).unwrap()
}

/// Builder pattern for creating test check-ins
pub struct CheckInBuilder {
    checkin: CheckIn,
}

impl CheckInBuilder {
    pub fn new(id: i64) -> Self {
        Self {
            checkin: CheckIn {
                id,
                status: WorkflowStatus::from("checked_in"),
                status_changed_at: None,
                check_in_time: None,
                patient: Some(id * 100),
                patient_name: Some(format!("Patient {id}")),
                mrn: Some(format!("MRN-{id}")),
                room: None,
                assigned_staff_name: None,
                provider_name: None,
            },
        }
    }

    pub fn status(mut self, status: &str) -> Self {
        self.checkin.status = WorkflowStatus::from(status);
        self
    }

    /// Arrived `minutes` before [`test_now`]
    pub fn arrived_minutes_ago(mut self, minutes: i64) -> Self {
        self.checkin.check_in_time = Some(test_now() - Duration::minutes(minutes));
        self
    }

    /// Entered the current status `minutes` before [`test_now`]
    pub fn in_status_for_minutes(mut self, minutes: i64) -> Self {
        self.checkin.status_changed_at = Some(test_now() - Duration::minutes(minutes));
        self
    }

    pub fn room(mut self, room: &str) -> Self {
        self.checkin.room = Some(room.to_string());
        self
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.checkin.provider_name = Some(provider.to_string());
        self
    }

    pub fn build(self) -> CheckIn {
        self.checkin
    }
}

/// The three-patient board most controller tests start from
pub fn sample_board() -> Vec<CheckIn> {
    vec![
        CheckInBuilder::new(1)
            .status("ready")
            .arrived_minutes_ago(40)
            .in_status_for_minutes(5)
            .build(),
        CheckInBuilder::new(2)
            .status("checked_in")
            .arrived_minutes_ago(50)
            .in_status_for_minutes(50)
            .build(),
        CheckInBuilder::new(3)
            .status("roomed")
            .arrived_minutes_ago(90)
            .in_status_for_minutes(65)
            .room("OR-2")
            .provider("Dr. Patel")
            .build(),
    ]
}

pub fn waiter(checkin_id: i64, status: &str, minutes: i64, threshold: Option<i64>) -> WaiterRecord {
    WaiterRecord {
        checkin_id,
        patient_id: Some(checkin_id * 100),
        patient_name: Some(format!("Patient {checkin_id}")),
        mrn: Some(format!("MRN-{checkin_id}")),
        status: WorkflowStatus::from(status),
        minutes_in_status: minutes,
        alert: false,
        threshold_minutes: threshold,
    }
}
