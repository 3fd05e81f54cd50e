//! Row view-models for the live board.

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::constants::{status_groups, EMPTY_DISPLAY};
use crate::labels::WorkflowLabels;
use crate::models::CheckIn;
use crate::state_machine::{CheckInStatus, TransitionPolicy, WorkflowStatus};
use crate::timing::TimeInStatus;

/// Backend command an action button issues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCommand {
    SetStatus(CheckInStatus),
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub target: CheckInStatus,
    pub label: String,
    pub command: ActionCommand,
    /// Allowed by the transition policy and no command already in flight
    pub enabled: bool,
    /// A command for this row is in flight
    pub working: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPill {
    pub status: WorkflowStatus,
    pub label: String,
    /// Hover text, e.g. "In Room at 14:05:00"
    pub title: String,
}

/// One rendered row of the live board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRow {
    pub checkin_id: i64,
    pub patient_id: Option<i64>,
    pub check_in_clock: String,
    pub patient_name: String,
    pub mrn: String,
    pub room: String,
    pub staff: String,
    pub provider: String,
    pub status: StatusPill,
    pub time_in_status: TimeInStatus,
    pub actions: Vec<ActionButton>,
}

impl BoardRow {
    pub fn action(&self, target: CheckInStatus) -> Option<&ActionButton> {
        self.actions.iter().find(|action| action.target == target)
    }
}

/// Everything needed to render rows at one clock tick
pub struct RowRenderer<'a> {
    pub labels: &'a WorkflowLabels,
    pub policy: &'a TransitionPolicy,
    pub now: DateTime<Utc>,
    pub in_flight: &'a HashSet<i64>,
}

impl RowRenderer<'_> {
    pub fn render(&self, checkin: &CheckIn) -> BoardRow {
        let label = self.labels.label(checkin.status.as_str());
        let title = match checkin.status_changed_at {
            Some(changed_at) => format!("{label} at {}", changed_at.format("%H:%M:%S")),
            None => label.clone(),
        };
        let working = self.in_flight.contains(&checkin.id);

        let actions = status_groups::ACTION_TARGETS
            .iter()
            .map(|&target| ActionButton {
                target,
                label: self.labels.label(target.as_str()),
                command: match target {
                    CheckInStatus::Completed => ActionCommand::Complete,
                    other => ActionCommand::SetStatus(other),
                },
                enabled: !working && self.policy.is_allowed(&checkin.status, target),
                working,
            })
            .collect();

        BoardRow {
            checkin_id: checkin.id,
            patient_id: checkin.patient,
            check_in_clock: checkin
                .check_in_time
                .map(|time| time.format("%H:%M").to_string())
                .unwrap_or_else(|| EMPTY_DISPLAY.to_string()),
            patient_name: display(&checkin.patient_name),
            mrn: display(&checkin.mrn),
            room: display(&checkin.room),
            staff: display(&checkin.assigned_staff_name),
            provider: display(&checkin.provider_name),
            status: StatusPill {
                status: checkin.status.clone(),
                label,
                title,
            },
            time_in_status: TimeInStatus::for_checkin(checkin, self.now),
            actions,
        }
    }
}

fn display(value: &Option<String>) -> String {
    value
        .clone()
        .unwrap_or_else(|| EMPTY_DISPLAY.to_string())
}
