//! # Live Board
//!
//! Client-side model of the live patient board: display ordering, row
//! view-models, the refresh/command controller and its timers.

pub mod controller;
pub mod runtime;
pub mod sort;
pub mod view;

use thiserror::Error;

use crate::client::ClientError;
use crate::state_machine::CheckInStatus;

pub use controller::{BoardPhase, BoardSnapshot, LiveBoardController, RefreshOutcome};
pub use runtime::BoardRuntime;
pub use sort::sort_for_display;
pub use view::{ActionButton, ActionCommand, BoardRow, RowRenderer, StatusPill};

/// Reasons a board command was not carried out
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Transition not allowed for check-in {checkin_id}: {from} -> {to}")]
    TransitionNotAllowed {
        checkin_id: i64,
        from: String,
        to: CheckInStatus,
    },

    #[error("Check-in {checkin_id} is not on the live board")]
    UnknownCheckIn { checkin_id: i64 },

    #[error("A command for check-in {checkin_id} is already in flight")]
    CommandInFlight { checkin_id: i64 },

    #[error("Backend rejected command for check-in {checkin_id}: {source}")]
    Rejected {
        checkin_id: i64,
        #[source]
        source: ClientError,
    },

    #[error("Live board has been torn down")]
    Detached,
}

impl BoardError {
    /// Whether the request reached the backend
    pub fn reached_backend(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}
