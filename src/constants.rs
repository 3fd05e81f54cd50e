//! # System Constants
//!
//! Endpoint paths, timer defaults, display placeholders and event names that
//! define the operational boundaries of the live board.

// Re-export the workflow status for convenience
pub use crate::state_machine::CheckInStatus;

/// Placeholder rendered for any missing or unknowable display value
pub const EMPTY_DISPLAY: &str = "—";

/// Collaborator endpoint paths, relative to the configured API base URL
pub mod endpoints {
    pub const LIVE_CHECKINS: &str = "checkins/live/";
    pub const CLINIC_CONFIG: &str = "clinic/config/";
    pub const DASHBOARD_METRICS: &str = "metrics/dashboard/";

    /// `POST checkins/{id}/set-status/`
    pub fn set_status(checkin_id: i64) -> String {
        format!("checkins/{checkin_id}/set-status/")
    }

    /// `POST checkins/{id}/complete/`
    pub fn complete(checkin_id: i64) -> String {
        format!("checkins/{checkin_id}/complete/")
    }
}

/// Timer defaults for the live board and metrics dashboard
pub mod timers {
    pub const CLOCK_TICK_SECONDS: u64 = 15;
    pub const BOARD_REFRESH_SECONDS: u64 = 30;
    pub const METRICS_REFRESH_SECONDS: u64 = 30;
}

/// User-facing messages surfaced as banners or blocking alerts
pub mod messages {
    pub const LIVE_LOAD_FAILED: &str = "Failed to load live patients.";
    pub const STATUS_UPDATE_FAILED: &str = "Failed to update status.";
    pub const COMPLETE_FAILED: &str = "Failed to complete.";
    pub const METRICS_LOAD_FAILED: &str = "Failed to load metrics dashboard.";

    pub const NO_LIVE_PATIENTS: &str = "No patients are currently checked in.";
    pub const NO_LIVE_COUNTS: &str = "No live patients.";
    pub const NO_PROVIDER_COUNTS: &str = "No provider assignments on live patients yet.";
    pub const NO_OUTCOMES: &str = "No appointments scheduled for today.";
    pub const NO_PROVIDER_OUTCOMES: &str = "No provider outcomes yet for this day.";
    pub const NO_WAITERS: &str = "No live waiters.";
    pub const NO_METRICS: &str = "No metrics available.";

    pub const UNASSIGNED_PROVIDER: &str = "Unassigned";
}

/// Board lifecycle event names published on the event channel
pub mod events {
    pub const BOARD_REFRESHED: &str = "board.refreshed";
    pub const BOARD_REFRESH_FAILED: &str = "board.refresh_failed";
    pub const BOARD_TICK: &str = "board.tick";
    pub const CHECKIN_STATUS_CHANGED: &str = "checkin.status_changed";
    pub const CHECKIN_COMMAND_REJECTED: &str = "checkin.command_rejected";
    pub const METRICS_REFRESHED: &str = "metrics.refreshed";
}

/// Status groupings used by rendering code
pub mod status_groups {
    use super::CheckInStatus;

    /// Statuses that get an action button on every board row, in button order
    pub const ACTION_TARGETS: [CheckInStatus; 4] = [
        CheckInStatus::Roomed,
        CheckInStatus::Ready,
        CheckInStatus::InProgress,
        CheckInStatus::Completed,
    ];
}
