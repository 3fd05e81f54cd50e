//! # Live Board Controller
//!
//! Owns the client-side list of active check-ins and mediates every status
//! command.
//!
//! ## Refresh contract
//!
//! - The live list is replaced wholesale on every successful response.
//! - A failed refresh keeps the previous list and raises a banner.
//! - Each refresh carries a sequence number; a response older than the one
//!   already applied is discarded.
//! - After [`LiveBoardController::teardown`] every response is a no-op.
//!
//! ## Command contract
//!
//! Commands are checked against the [`TransitionPolicy`] before any network
//! call, at most one command per check-in is in flight, and a successful
//! command is followed by a refresh. There is no optimistic local update.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use super::view::{ActionCommand, BoardRow, RowRenderer};
use super::BoardError;
use crate::client::ClinicApi;
use crate::constants::messages;
use crate::events::{BoardEvent, BoardEventPublisher};
use crate::labels::{ClinicConfigProvider, WorkflowLabels};
use crate::logging::{log_checkin_operation, log_error};
use crate::models::CheckIn;
use crate::state_machine::{CheckInStatus, TransitionPolicy};

use super::sort::sort_for_display;

/// Client-visible phase of the controller itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    /// Nothing requested yet
    Idle,
    /// At least one refresh is in flight
    Loading,
    /// The newest applied refresh succeeded
    Ready,
    /// The newest applied refresh failed; earlier data is still shown
    Error,
}

/// Result of one [`LiveBoardController::refresh`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { count: usize },
    Failed { message: String },
    /// A newer response was already applied
    Superseded,
    /// The board was torn down before the response arrived
    Detached,
}

/// Point-in-time copy of the board for rendering
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    pub phase: BoardPhase,
    /// Sorted for display
    pub checkins: Vec<CheckIn>,
    pub rows: Vec<BoardRow>,
    /// Dismissible banner for failed refreshes
    pub banner: Option<String>,
    /// Blocking alert for rejected commands
    pub alert: Option<String>,
    pub now: DateTime<Utc>,
    /// Whether any refresh has ever succeeded
    pub loaded: bool,
}

impl BoardSnapshot {
    /// Loaded and confirmed empty, as opposed to still loading
    pub fn is_empty_board(&self) -> bool {
        self.loaded && self.checkins.is_empty()
    }

    /// Empty-state message, only once the board has loaded
    pub fn empty_message(&self) -> Option<&'static str> {
        self.is_empty_board().then_some(messages::NO_LIVE_PATIENTS)
    }

    pub fn active_count(&self) -> usize {
        self.checkins.len()
    }
}

#[derive(Debug)]
struct BoardState {
    phase: BoardPhase,
    last_outcome: BoardPhase,
    checkins: Vec<CheckIn>,
    loaded: bool,
    banner: Option<String>,
    alert: Option<String>,
    now: DateTime<Utc>,
    next_sequence: u64,
    applied_sequence: u64,
    pending_refreshes: usize,
    in_flight: HashSet<i64>,
    detached: bool,
}

impl BoardState {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            phase: BoardPhase::Idle,
            last_outcome: BoardPhase::Idle,
            checkins: Vec::new(),
            loaded: false,
            banner: None,
            alert: None,
            now,
            next_sequence: 0,
            applied_sequence: 0,
            pending_refreshes: 0,
            in_flight: HashSet::new(),
            detached: false,
        }
    }

    fn settle_phase(&mut self) {
        self.phase = if self.pending_refreshes > 0 {
            BoardPhase::Loading
        } else {
            self.last_outcome
        };
    }
}

/// Authoritative client-side view of active check-ins
pub struct LiveBoardController {
    api: Arc<dyn ClinicApi>,
    labels: Arc<ClinicConfigProvider>,
    policy: TransitionPolicy,
    events: BoardEventPublisher,
    state: RwLock<BoardState>,
}

impl std::fmt::Debug for LiveBoardController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("LiveBoardController")
            .field("phase", &state.phase)
            .field("checkins", &state.checkins.len())
            .field("applied_sequence", &state.applied_sequence)
            .field("detached", &state.detached)
            .finish()
    }
}

impl LiveBoardController {
    pub fn new(
        api: Arc<dyn ClinicApi>,
        labels: Arc<ClinicConfigProvider>,
        policy: TransitionPolicy,
    ) -> Self {
        Self::with_events(api, labels, policy, BoardEventPublisher::default())
    }

    pub fn with_events(
        api: Arc<dyn ClinicApi>,
        labels: Arc<ClinicConfigProvider>,
        policy: TransitionPolicy,
        events: BoardEventPublisher,
    ) -> Self {
        Self {
            api,
            labels,
            policy,
            events,
            state: RwLock::new(BoardState::new(Utc::now())),
        }
    }

    pub fn events(&self) -> &BoardEventPublisher {
        &self.events
    }

    pub fn policy(&self) -> &TransitionPolicy {
        &self.policy
    }

    pub fn phase(&self) -> BoardPhase {
        self.state.read().phase
    }

    /// Fetch the live list and replace the board contents.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> RefreshOutcome {
        let sequence = {
            let mut state = self.state.write();
            if state.detached {
                return RefreshOutcome::Detached;
            }
            state.next_sequence += 1;
            state.pending_refreshes += 1;
            state.phase = BoardPhase::Loading;
            state.next_sequence
        };

        debug!(sequence, "Refreshing live check-ins");
        // Labels are cached after the first load, so only the first refresh
        // can be held up by a slow clinic config fetch.
        let (_, result) = futures::join!(self.labels.load(), self.api.live_checkins());

        let outcome = {
            let mut state = self.state.write();
            state.pending_refreshes = state.pending_refreshes.saturating_sub(1);

            if state.detached {
                return RefreshOutcome::Detached;
            }

            if sequence < state.applied_sequence {
                state.settle_phase();
                debug!(
                    sequence,
                    applied = state.applied_sequence,
                    "Discarding superseded live check-ins response"
                );
                return RefreshOutcome::Superseded;
            }
            state.applied_sequence = sequence;

            let outcome = match result {
                Ok(mut checkins) => {
                    sort_for_display(&mut checkins);
                    let count = checkins.len();
                    state.checkins = checkins;
                    state.loaded = true;
                    state.banner = None;
                    state.last_outcome = BoardPhase::Ready;
                    RefreshOutcome::Applied { count }
                }
                Err(e) => {
                    log_error("live_board", "refresh", &e.to_string(), None);
                    state.banner = Some(messages::LIVE_LOAD_FAILED.to_string());
                    state.last_outcome = BoardPhase::Error;
                    RefreshOutcome::Failed {
                        message: messages::LIVE_LOAD_FAILED.to_string(),
                    }
                }
            };
            state.settle_phase();
            outcome
        };

        match &outcome {
            RefreshOutcome::Applied { count } => {
                debug!(sequence, count, "Applied live check-ins");
                self.events.publish(BoardEvent::Refreshed {
                    sequence,
                    count: *count,
                });
            }
            RefreshOutcome::Failed { message } => {
                self.events.publish(BoardEvent::RefreshFailed {
                    sequence,
                    message: message.clone(),
                });
            }
            RefreshOutcome::Superseded | RefreshOutcome::Detached => {}
        }

        outcome
    }

    /// Ask the backend to move a check-in to `target`.
    pub async fn request_status_change(
        &self,
        checkin_id: i64,
        target: CheckInStatus,
    ) -> Result<(), BoardError> {
        self.run_command(checkin_id, ActionCommand::SetStatus(target))
            .await
    }

    /// Ask the backend to complete a check-in.
    pub async fn complete(&self, checkin_id: i64) -> Result<(), BoardError> {
        self.run_command(checkin_id, ActionCommand::Complete).await
    }

    /// Issue whichever command an action button carries
    pub async fn perform(&self, checkin_id: i64, command: ActionCommand) -> Result<(), BoardError> {
        self.run_command(checkin_id, command).await
    }

    #[instrument(skip(self))]
    async fn run_command(&self, checkin_id: i64, command: ActionCommand) -> Result<(), BoardError> {
        let target = match command {
            ActionCommand::SetStatus(target) => target,
            ActionCommand::Complete => CheckInStatus::Completed,
        };

        let from_status = {
            let mut state = self.state.write();
            if state.detached {
                return Err(BoardError::Detached);
            }
            let current = state
                .checkins
                .iter()
                .find(|checkin| checkin.id == checkin_id)
                .map(|checkin| checkin.status.clone())
                .ok_or(BoardError::UnknownCheckIn { checkin_id })?;

            if !self.policy.is_allowed(&current, target) {
                return Err(BoardError::TransitionNotAllowed {
                    checkin_id,
                    from: current.to_string(),
                    to: target,
                });
            }
            if !state.in_flight.insert(checkin_id) {
                return Err(BoardError::CommandInFlight { checkin_id });
            }
            current.to_string()
        };

        let (operation, failure_message) = match command {
            ActionCommand::SetStatus(_) => ("set_status", messages::STATUS_UPDATE_FAILED),
            ActionCommand::Complete => ("complete", messages::COMPLETE_FAILED),
        };

        let result = match command {
            ActionCommand::SetStatus(target) => self.api.set_status(checkin_id, target).await,
            ActionCommand::Complete => self.api.complete(checkin_id).await,
        };

        {
            let mut state = self.state.write();
            state.in_flight.remove(&checkin_id);
            if result.is_err() && !state.detached {
                state.alert = Some(failure_message.to_string());
            }
        }

        match result {
            Ok(()) => {
                log_checkin_operation(
                    operation,
                    checkin_id,
                    Some(&from_status),
                    target.as_str(),
                    "accepted",
                    None,
                );
                self.events
                    .publish(BoardEvent::StatusChanged { checkin_id, target });
                self.refresh().await;
                Ok(())
            }
            Err(source) => {
                warn!(checkin_id, target = %target, error = %source, "Status command rejected");
                log_checkin_operation(
                    operation,
                    checkin_id,
                    Some(&from_status),
                    target.as_str(),
                    "rejected",
                    Some(&source.to_string()),
                );
                self.events.publish(BoardEvent::CommandRejected {
                    checkin_id,
                    message: failure_message.to_string(),
                });
                Err(BoardError::Rejected { checkin_id, source })
            }
        }
    }

    /// Advance the shared clock used for time-in-status.
    pub fn tick(&self, now: DateTime<Utc>) {
        {
            let mut state = self.state.write();
            if state.detached {
                return;
            }
            state.now = now;
        }
        self.events.publish(BoardEvent::Tick { now });
    }

    pub fn dismiss_banner(&self) {
        self.state.write().banner = None;
    }

    pub fn dismiss_alert(&self) {
        self.state.write().alert = None;
    }

    /// Detach the controller from its view. Responses arriving afterwards
    /// are ignored and commands are refused.
    pub fn teardown(&self) {
        let mut state = self.state.write();
        if !state.detached {
            state.detached = true;
            info!("Live board torn down");
        }
    }

    pub fn is_detached(&self) -> bool {
        self.state.read().detached
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        let labels: Arc<WorkflowLabels> = self.labels.current();
        let state = self.state.read();
        let renderer = RowRenderer {
            labels: &labels,
            policy: &self.policy,
            now: state.now,
            in_flight: &state.in_flight,
        };
        let rows = state
            .checkins
            .iter()
            .map(|checkin| renderer.render(checkin))
            .collect();

        BoardSnapshot {
            phase: state.phase,
            checkins: state.checkins.clone(),
            rows,
            banner: state.banner.clone(),
            alert: state.alert.clone(),
            now: state.now,
            loaded: state.loaded,
        }
    }
}
