use thiserror::Error;

/// Errors raised while building a transition policy from configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Unknown status in transition table: {status}")]
    UnknownStatus { status: String },

    #[error("Self transition not permitted: {status}")]
    SelfTransition { status: String },

    #[error("Regression not permitted: {from} -> {to}")]
    Regression { from: String, to: String },

    #[error("Transition {from} -> {to} skips room assignment")]
    SkipsRoomAssignment { from: String, to: String },

    #[error("Terminal status {status} cannot have outgoing transitions")]
    TerminalHasTransitions { status: String },
}

pub type PolicyResult<T> = Result<T, PolicyError>;
