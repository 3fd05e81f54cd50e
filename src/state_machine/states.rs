use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Check-in workflow states, in stage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckInStatus {
    /// Patient has arrived and been admitted to the workflow
    CheckedIn,
    /// Patient has been assigned a room
    Roomed,
    /// Patient is prepped and waiting for the provider
    Ready,
    /// Procedure or visit underway
    InProgress,
    /// Visit finished; the check-in leaves the live board
    Completed,
}

impl CheckInStatus {
    /// Every status in stage order
    pub const ALL: [CheckInStatus; 5] = [
        Self::CheckedIn,
        Self::Roomed,
        Self::Ready,
        Self::InProgress,
        Self::Completed,
    ];

    /// Position of this status in the workflow
    pub fn stage_index(&self) -> usize {
        match self {
            Self::CheckedIn => 0,
            Self::Roomed => 1,
            Self::Ready => 2,
            Self::InProgress => 3,
            Self::Completed => 4,
        }
    }

    /// Wire key used by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CheckedIn => "checked_in",
            Self::Roomed => "roomed",
            Self::Ready => "ready",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Check if this is a terminal state (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for CheckInStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CheckInStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "checked_in" => Ok(Self::CheckedIn),
            "roomed" => Ok(Self::Roomed),
            "ready" => Ok(Self::Ready),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("Invalid check-in status: {s}")),
        }
    }
}

/// Status as delivered by the backend.
///
/// Values outside the enumerated workflow are kept verbatim so they can still
/// be displayed; they never have outgoing transitions and sort after every
/// known stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WorkflowStatus {
    Known(CheckInStatus),
    Unknown(String),
}

impl WorkflowStatus {
    pub fn known(&self) -> Option<CheckInStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Unknown(_) => None,
        }
    }

    /// Raw backend key
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Unknown(raw) => raw,
        }
    }

    /// Stage index used for display ordering; unknown values sort last
    pub fn sort_rank(&self) -> usize {
        self.known()
            .map(|status| status.stage_index())
            .unwrap_or(usize::MAX)
    }

    /// Compare two statuses by workflow stage
    pub fn cmp_stage(&self, other: &Self) -> Ordering {
        self.sort_rank().cmp(&other.sort_rank())
    }
}

impl Default for WorkflowStatus {
    /// Placeholder for a row that arrived without a usable status
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for WorkflowStatus {
    fn from(raw: String) -> Self {
        match raw.parse::<CheckInStatus>() {
            Ok(status) => Self::Known(status),
            Err(_) => Self::Unknown(raw),
        }
    }
}

impl From<&str> for WorkflowStatus {
    fn from(raw: &str) -> Self {
        Self::from(raw.to_string())
    }
}

impl From<CheckInStatus> for WorkflowStatus {
    fn from(status: CheckInStatus) -> Self {
        Self::Known(status)
    }
}

impl From<WorkflowStatus> for String {
    fn from(status: WorkflowStatus) -> Self {
        match status {
            WorkflowStatus::Known(status) => status.as_str().to_string(),
            WorkflowStatus::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_check() {
        assert!(CheckInStatus::Completed.is_terminal());
        assert!(!CheckInStatus::CheckedIn.is_terminal());
        assert!(!CheckInStatus::InProgress.is_terminal());
    }

    #[test]
    fn test_stage_order_matches_all() {
        for (index, status) in CheckInStatus::ALL.iter().enumerate() {
            assert_eq!(status.stage_index(), index);
        }
    }

    #[test]
    fn test_state_string_conversion() {
        assert_eq!(CheckInStatus::InProgress.to_string(), "in_progress");
        assert_eq!(
            "roomed".parse::<CheckInStatus>().unwrap(),
            CheckInStatus::Roomed
        );
        assert!("triaged".parse::<CheckInStatus>().is_err());
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: WorkflowStatus = serde_json::from_str("\"triaged\"").unwrap();
        assert_eq!(status, WorkflowStatus::Unknown("triaged".to_string()));
        assert_eq!(status.as_str(), "triaged");
        assert_eq!(status.sort_rank(), usize::MAX);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"triaged\"");
    }

    #[test]
    fn test_known_status_serde() {
        let status: WorkflowStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(status.known(), Some(CheckInStatus::InProgress));
        assert_eq!(
            WorkflowStatus::Unknown("x".into()).cmp_stage(&status),
            Ordering::Greater
        );
    }
}
