#![allow(dead_code)]

use clinic_flow::state_machine::{CheckInStatus, WorkflowStatus};
use proptest::prelude::*;

/// Strategy for generating known check-in statuses
pub fn status_strategy() -> impl Strategy<Value = CheckInStatus> {
    prop::sample::select(CheckInStatus::ALL.to_vec())
}

/// Strategy for generating raw status keys the backend might send,
/// including ones the client has never heard of
pub fn workflow_status_strategy() -> impl Strategy<Value = WorkflowStatus> {
    prop_oneof![
        status_strategy().prop_map(WorkflowStatus::Known),
        "[a-z][a-z_]{0,15}".prop_map(WorkflowStatus::from),
    ]
}

/// Strategy for generating non-negative elapsed seconds up to two days
pub fn elapsed_seconds_strategy() -> impl Strategy<Value = i64> {
    0i64..172_800
}
