use std::collections::{BTreeSet, HashMap};

use super::errors::{PolicyError, PolicyResult};
use super::states::{CheckInStatus, WorkflowStatus};

/// Allowed-transition table for the check-in workflow.
///
/// The standard table lets a clinic skip `ready` but never move backward and
/// never start before a room is assigned. Clinics may supply their own table;
/// it is validated to stay forward-only and to room every patient first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPolicy {
    allowed: HashMap<CheckInStatus, BTreeSet<CheckInStatus>>,
}

impl TransitionPolicy {
    /// The table every clinic uses unless configured otherwise
    pub fn standard() -> Self {
        use CheckInStatus::*;

        let mut allowed = HashMap::new();
        allowed.insert(CheckedIn, BTreeSet::from([Roomed]));
        allowed.insert(Roomed, BTreeSet::from([Ready, InProgress, Completed]));
        allowed.insert(Ready, BTreeSet::from([InProgress, Completed]));
        allowed.insert(InProgress, BTreeSet::from([Completed]));
        allowed.insert(Completed, BTreeSet::new());

        Self { allowed }
    }

    /// Build a policy from raw status keys, as found in configuration.
    ///
    /// Statuses missing from `table` get no outgoing transitions.
    pub fn from_table(table: &HashMap<String, Vec<String>>) -> PolicyResult<Self> {
        let mut allowed: HashMap<CheckInStatus, BTreeSet<CheckInStatus>> = CheckInStatus::ALL
            .iter()
            .map(|status| (*status, BTreeSet::new()))
            .collect();

        for (from_key, targets) in table {
            let from = parse_status(from_key)?;
            for to_key in targets {
                let to = parse_status(to_key)?;
                if from == to {
                    return Err(PolicyError::SelfTransition {
                        status: from.to_string(),
                    });
                }
                if from.is_terminal() {
                    return Err(PolicyError::TerminalHasTransitions {
                        status: from.to_string(),
                    });
                }
                if to.stage_index() < from.stage_index() {
                    return Err(PolicyError::Regression {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                if from == CheckInStatus::CheckedIn && to != CheckInStatus::Roomed {
                    return Err(PolicyError::SkipsRoomAssignment {
                        from: from.to_string(),
                        to: to.to_string(),
                    });
                }
                allowed.entry(from).or_default().insert(to);
            }
        }

        Ok(Self { allowed })
    }

    /// Whether `current -> target` is a legal transition.
    ///
    /// Unknown current statuses fail closed.
    pub fn is_allowed(&self, current: &WorkflowStatus, target: CheckInStatus) -> bool {
        match current.known() {
            Some(status) => self
                .allowed
                .get(&status)
                .is_some_and(|targets| targets.contains(&target)),
            None => false,
        }
    }

    /// Legal targets from `current`, in stage order
    pub fn allowed_targets(&self, current: &WorkflowStatus) -> Vec<CheckInStatus> {
        current
            .known()
            .and_then(|status| self.allowed.get(&status))
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default()
    }
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

fn parse_status(key: &str) -> PolicyResult<CheckInStatus> {
    key.parse().map_err(|_| PolicyError::UnknownStatus {
        status: key.to_string(),
    })
}
